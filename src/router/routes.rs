//! Route table of the admin front end and path resolution.

/// Path that matches anything no other record claims.
pub const CATCH_ALL: &str = "/:pathMatch(.*)*";

pub const LOGIN: &str = "accounts-login";
pub const LOGOUT: &str = "accounts-logout";
pub const NOT_FOUND: &str = "page-not-found-404";

/// One entry of the route tree. Layout records group children and carry no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Joined to the parent's path unless it starts with `/`
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub requires_auth: bool,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    #[must_use]
    pub const fn page(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name: Some(name),
            requires_auth: false,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn layout(path: &'static str, children: Vec<Self>) -> Self {
        Self {
            path,
            name: None,
            requires_auth: false,
            children,
        }
    }

    #[must_use]
    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// A record on the matched chain, with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub path: String,
    pub name: Option<&'static str>,
    pub requires_auth: bool,
}

/// Result of resolving a path: the target's name and the chain of records
/// from the outermost layout down to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: String,
    pub matched: Vec<MatchedRecord>,
}

impl Route {
    /// Whether the target or any of its ancestors requires a logged-in user.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|record| record.requires_auth)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteRecord::layout(
                "/",
                vec![
                    RouteRecord::page("", "inicial"),
                    RouteRecord::page("getstarted", "base-getstarted"),
                ],
            ),
            RouteRecord::layout(
                "/accounts",
                vec![
                    RouteRecord::page("login", LOGIN),
                    RouteRecord::page("logout", LOGOUT),
                ],
            ),
            RouteRecord::layout(
                "",
                vec![RouteRecord::page("/gestao/usuarios", "usuarios").protected()],
            ),
            RouteRecord::layout(
                "/",
                vec![
                    RouteRecord::page("gastos", "gastos"),
                    RouteRecord::page("gestao", "gestao"),
                ],
            )
            .protected(),
            RouteRecord::page(CATCH_ALL, NOT_FOUND),
        ])
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(records: Vec<RouteRecord>) -> Self {
        Self { records }
    }

    /// Resolves `path` to the first named record in declaration order whose full
    /// path matches. Query strings, fragments and trailing slashes are ignored.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let wanted = normalize(path);
        self.find(|full, _| full == CATCH_ALL || full == wanted)
            .map(|matched| Route {
                name: matched.last().and_then(|r| r.name).unwrap_or(NOT_FOUND),
                path: wanted,
                matched,
            })
    }

    /// The route registered under `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Route> {
        self.find(|_, record| record.name == Some(name))
            .and_then(|matched| {
                let leaf = matched.last()?;
                Some(Route {
                    name: leaf.name?,
                    path: leaf.path.clone(),
                    matched,
                })
            })
    }

    fn find<F>(&self, accept: F) -> Option<Vec<MatchedRecord>>
    where
        F: Fn(&str, &RouteRecord) -> bool,
    {
        let mut chain = Vec::new();
        self.records
            .iter()
            .find_map(|record| walk(record, "", &mut chain, &accept))
    }
}

/// Depth-first search for the first named record `accept` agrees to.
fn walk<F>(
    record: &RouteRecord,
    parent: &str,
    chain: &mut Vec<MatchedRecord>,
    accept: &F,
) -> Option<Vec<MatchedRecord>>
where
    F: Fn(&str, &RouteRecord) -> bool,
{
    let full = join(parent, record.path);
    chain.push(MatchedRecord {
        path: normalize(&full),
        name: record.name,
        requires_auth: record.requires_auth,
    });

    let found = if record.name.is_some() && accept(&normalize_pattern(&full), record) {
        Some(chain.clone())
    } else {
        record
            .children
            .iter()
            .find_map(|child| walk(child, &full, chain, accept))
    };
    chain.pop();
    found
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else if child.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{child}", parent.trim_end_matches('/'))
    }
}

fn normalize_pattern(full: &str) -> String {
    if full == CATCH_ALL {
        full.to_string()
    } else {
        normalize(full)
    }
}

/// `/gastos/?page=2` and `gastos` both become `/gastos`.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nested_child_paths() {
        let table = RouteTable::default();
        let route = table.resolve("/getstarted").map(|r| r.name);
        assert_eq!(route, Some("base-getstarted"));
        assert_eq!(table.resolve("/").map(|r| r.name), Some("inicial"));
        assert_eq!(table.resolve("/accounts/login").map(|r| r.name), Some(LOGIN));
    }

    #[test]
    fn test_absolute_child_path_is_not_joined() {
        let route = RouteTable::default().resolve("/gestao/usuarios");
        assert_eq!(route.as_ref().map(|r| r.name), Some("usuarios"));
        assert!(route.is_some_and(|r| r.requires_auth()));
    }

    #[test]
    fn test_protection_is_inherited_from_layout() {
        let table = RouteTable::default();
        let gastos = table.resolve("/gastos/?page=2");
        assert_eq!(gastos.as_ref().map(|r| r.name), Some("gastos"));
        assert_eq!(gastos.as_ref().map(|r| r.matched.len()), Some(2));
        assert!(gastos.is_some_and(|r| r.requires_auth()));

        assert!(table.resolve("/getstarted").is_some_and(|r| !r.requires_auth()));
    }

    #[test]
    fn test_unknown_path_hits_catch_all() {
        let route = RouteTable::default().resolve("/nada/aqui");
        assert_eq!(route.as_ref().map(|r| r.name), Some(NOT_FOUND));
        assert_eq!(route.map(|r| r.path), Some("/nada/aqui".to_string()));
    }

    #[test]
    fn test_by_name() {
        let login = RouteTable::default().by_name(LOGIN);
        assert_eq!(login.map(|r| r.path), Some("/accounts/login".to_string()));
        assert!(RouteTable::default().by_name("inexistente").is_none());
    }

    #[test]
    fn test_table_without_catch_all() {
        let table = RouteTable::new(vec![RouteRecord::page("/", "inicial")]);
        assert!(table.resolve("/outra").is_none());
    }
}
