use super::OutputFormat;
use crate::errors::{Error, Result};
use crate::router::Navigation;
use crate::router::routes::LOGIN;
use crate::session::AppContext;
use serde::Serialize;
use tracing::{debug, info};

/// Login details from the command line or the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Navigates to `path`, logging in with `credentials` when the guard sends us
/// to the login page, and retries once.
pub(crate) async fn open_screen(
    ctx: &AppContext,
    path: &str,
    credentials: &Credentials,
) -> Result<Navigation> {
    let nav = ctx.router.push(path).await?;
    if nav.route.name != LOGIN || nav.redirected_from.is_none() {
        return Ok(nav);
    }

    debug!("{} requires a login", path);
    login_with(ctx, credentials).await?;
    let nav = ctx.router.push(path).await?;
    if nav.redirected_from.is_some() {
        return Err(Error::Config {
            message: format!("still not authorized to open {path} after logging in"),
        });
    }
    Ok(nav)
}

pub(crate) async fn login_with(ctx: &AppContext, credentials: &Credentials) -> Result<()> {
    let (Some(username), Some(password)) = (&credentials.username, &credentials.password) else {
        return Err(Error::Config {
            message: "login required: pass --username and --password or set GFINANCAS_USERNAME and GFINANCAS_PASSWORD"
                .to_string(),
        });
    };
    let user = ctx.accounts.login(username, password).await?;
    info!("Logged in as {}", user.username);
    Ok(())
}

/// Renders `value` as pretty JSON, or through `text` for humans.
pub(crate) fn render<T, F>(format: OutputFormat, value: &T, text: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|source| Error::Decode {
            path: "output".to_string(),
            source,
        }),
        OutputFormat::Text => Ok(text(value)),
    }
}

/// Brazilian currency, two decimals.
pub(crate) fn money(valor: f64) -> String {
    format!("R$ {valor:.2}")
}

/// One line per item, or a placeholder when there is nothing to show.
pub(crate) fn lines<T>(items: &[T], empty: &str, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(1234.5), "R$ 1234.50");
        assert_eq!(money(0.0), "R$ 0.00");
    }

    #[test]
    fn test_lines_placeholder() {
        let empty: [i32; 0] = [];
        assert_eq!(lines(&empty, "Nada.", ToString::to_string), "Nada.");
        assert_eq!(lines(&[1, 2], "Nada.", ToString::to_string), "1\n2");
    }

    #[test]
    fn test_render_json() -> Result<()> {
        let out = render(OutputFormat::Json, &[1, 2], |_| String::new())?;
        assert!(out.starts_with('['));
        let out = render(OutputFormat::Text, &[1, 2], |v| format!("{} itens", v.len()))?;
        assert_eq!(out, "2 itens");
        Ok(())
    }
}
