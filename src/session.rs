//! Application context wiring the HTTP client, stores and router together.

use crate::config::{Environment, Fixtures};
use crate::errors::Result;
use crate::http::{ApiClient, ReqwestTransport, Transport};
use crate::mock::MockServer;
use crate::router::{AuthGuard, RouteTable, Router};
use crate::stores::{AccountsStore, CoreStore, NotificationStore};
use std::sync::Arc;
use tracing::info;

/// Everything a front end session needs, built once and cloned freely.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub notifications: NotificationStore,
    pub accounts: AccountsStore,
    pub core: CoreStore,
    pub router: Router,
}

impl AppContext {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let api = ApiClient::new(transport);
        let notifications = NotificationStore::new();
        let accounts = AccountsStore::new(api.clone(), notifications.clone());
        let core = CoreStore::new(api.clone(), notifications.clone());
        let router = Router::new(RouteTable::default())
            .with_guard(Arc::new(AuthGuard::new(accounts.clone())));
        Self {
            api,
            notifications,
            accounts,
            core,
            router,
        }
    }

    /// Picks the transport from `env`: the mock server when `is_mock`, the real
    /// API at `api_base_url` otherwise.
    ///
    /// # Errors
    /// Returns an error if the mock fixtures cannot be loaded, the mock is requested
    /// outside development, or the HTTP client cannot be built.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        let transport: Arc<dyn Transport> = if env.is_mock {
            let fixtures = Fixtures::from_env_or_default()?;
            Arc::new(MockServer::for_environment(env, &fixtures)?)
        } else {
            info!("Using API at {}", env.api_base_url);
            Arc::new(ReqwestTransport::new(&env.api_base_url)?)
        };
        Ok(Self::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[tokio::test]
    async fn test_mock_environment_serves_fixtures() -> Result<()> {
        let env = Environment {
            is_dev: true,
            is_mock: true,
            ..Environment::default()
        };
        let ctx = AppContext::from_environment(&env)?;
        let user = ctx.accounts.login("admin", "admin123").await?;
        assert_eq!(user.username, "admin");
        Ok(())
    }

    #[test]
    fn test_mock_outside_development_is_rejected() {
        let env = Environment {
            is_dev: false,
            is_mock: true,
            ..Environment::default()
        };
        assert!(matches!(
            AppContext::from_environment(&env),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_real_transport_is_built_without_network() -> Result<()> {
        let ctx = AppContext::from_environment(&Environment::default())?;
        assert!(ctx.router.resolve("/gastos").is_some());
        Ok(())
    }
}
