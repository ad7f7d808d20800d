//! Client-side navigation with guards.
//!
//! [`Router::push`] resolves a path against the [`RouteTable`], runs every
//! [`NavigationGuard`] in registration order and follows redirects until a
//! guard lets the navigation through.

pub mod guard;
pub mod routes;

pub use guard::{AuthGuard, GuardDecision, NavigationGuard};
pub use routes::{MatchedRecord, Route, RouteRecord, RouteTable};

use crate::errors::{Error, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Upper bound on redirects followed by one navigation.
const MAX_REDIRECTS: usize = 5;

/// Outcome of a navigation that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// The originally requested route when a guard redirected
    pub redirected_from: Option<Route>,
}

#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    guards: Vec<Arc<dyn NavigationGuard>>,
    current: Arc<RwLock<Option<Route>>>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
            guards: Vec::new(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn with_guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guards.push(guard);
        self
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Route> {
        self.table.resolve(path)
    }

    /// Navigates to `path`.
    ///
    /// # Errors
    /// Returns [`Error::NoRoute`] when nothing matches, [`Error::RedirectLoop`] when
    /// the guards keep redirecting, and any error a guard raised.
    pub async fn push(&self, path: &str) -> Result<Navigation> {
        let target = self.table.resolve(path).ok_or_else(|| Error::NoRoute {
            path: path.to_string(),
        })?;
        self.navigate(target).await
    }

    /// Navigates to the route registered under `name`.
    pub async fn push_name(&self, name: &str) -> Result<Navigation> {
        let target = self.table.by_name(name).ok_or_else(|| Error::NoRoute {
            path: name.to_string(),
        })?;
        self.navigate(target).await
    }

    pub async fn current(&self) -> Option<Route> {
        self.current.read().await.clone()
    }

    async fn navigate(&self, mut target: Route) -> Result<Navigation> {
        let from = self.current().await;
        let requested = target.path.clone();
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            match self.run_guards(&target, from.as_ref()).await? {
                GuardDecision::Proceed => {
                    info!("Navigated to {} ({}).", target.path, target.name);
                    *self.current.write().await = Some(target.clone());
                    return Ok(Navigation {
                        route: target,
                        redirected_from,
                    });
                }
                GuardDecision::Redirect(name) => {
                    debug!(from = %target.path, to = name, "guard redirect");
                    let next = self.table.by_name(name).ok_or_else(|| Error::NoRoute {
                        path: name.to_string(),
                    })?;
                    redirected_from.get_or_insert(target);
                    target = next;
                }
            }
        }
        Err(Error::RedirectLoop { path: requested })
    }

    async fn run_guards(&self, to: &Route, from: Option<&Route>) -> Result<GuardDecision> {
        for guard in &self.guards {
            let decision = guard.before_each(to, from).await?;
            if decision != GuardDecision::Proceed {
                return Ok(decision);
            }
        }
        Ok(GuardDecision::Proceed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::accounts;
    use crate::http::{ApiRequest, ApiResponse, Method, Transport};
    use crate::session::AppContext;
    use crate::test_utils::{init_test_tracing, mock_context};
    use async_trait::async_trait;

    async fn whoami_calls(mock: &crate::mock::MockServer) -> usize {
        mock.requests()
            .await
            .iter()
            .filter(|(method, path)| *method == Method::Get && path == "/api/accounts/whoami")
            .count()
    }

    #[tokio::test]
    async fn test_protected_route_without_user_redirects_to_login() -> Result<()> {
        init_test_tracing();
        let (ctx, mock) = mock_context()?;

        let nav = ctx.router.push("/gastos").await?;
        assert_eq!(nav.route.name, routes::LOGIN);
        assert_eq!(nav.redirected_from.map(|r| r.name), Some("gastos"));
        assert_eq!(whoami_calls(&mock).await, 1);
        assert_eq!(ctx.router.current().await.map(|r| r.name), Some(routes::LOGIN));
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_session_is_checked_once() -> Result<()> {
        init_test_tracing();
        let (ctx, mock) = mock_context()?;
        // Session opened on the server without the store knowing about it
        accounts::login(&ctx.api, "admin", "admin123").await?;
        mock.clear_requests().await;

        let nav = ctx.router.push("/gestao/usuarios").await?;
        assert_eq!(nav.route.name, "usuarios");
        assert!(nav.redirected_from.is_none());
        assert_eq!(whoami_calls(&mock).await, 1);

        ctx.router.push("/gestao").await?;
        ctx.router.push("/gastos").await?;
        assert_eq!(whoami_calls(&mock).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unprotected_route_skips_identity_check() -> Result<()> {
        init_test_tracing();
        let (ctx, mock) = mock_context()?;

        let nav = ctx.router.push("/getstarted").await?;
        assert_eq!(nav.route.name, "base-getstarted");
        ctx.router.push("/rota/desconhecida").await?;
        assert!(mock.requests().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_login_clears_redirect() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = mock_context()?;
        assert_eq!(ctx.router.push("/gestao").await?.route.name, routes::LOGIN);

        ctx.accounts.login("admin", "admin123").await?;
        let nav = ctx.router.push("/gestao").await?;
        assert_eq!(nav.route.name, "gestao");
        assert!(nav.redirected_from.is_none());
        Ok(())
    }

    struct AlwaysRedirect;

    #[async_trait]
    impl NavigationGuard for AlwaysRedirect {
        async fn before_each(&self, _to: &Route, _from: Option<&Route>) -> Result<GuardDecision> {
            Ok(GuardDecision::Redirect("inicial"))
        }
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let router = Router::new(RouteTable::default()).with_guard(Arc::new(AlwaysRedirect));
        let result = router.push("/getstarted").await;
        assert!(matches!(result, Err(Error::RedirectLoop { ref path }) if path == "/getstarted"));
        assert!(router.current().await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_path_without_catch_all() {
        let router = Router::new(RouteTable::new(vec![
            RouteRecord::page("/privado", "privado").protected(),
        ]));
        assert!(matches!(
            router.push("/publico").await,
            Err(Error::NoRoute { .. })
        ));
    }

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse> {
            Err(Error::Io(std::io::Error::other("offline")))
        }
    }

    #[tokio::test]
    async fn test_identity_check_errors_propagate() {
        init_test_tracing();
        let ctx = AppContext::new(Arc::new(Offline));
        assert!(matches!(ctx.router.push("/gastos").await, Err(Error::Io(_))));
        assert!(ctx.router.current().await.is_none());
    }
}
