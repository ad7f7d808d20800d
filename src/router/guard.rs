use super::routes::{LOGIN, Route};
use crate::errors::Result;
use crate::stores::AccountsStore;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Navigate to the named route instead
    Redirect(&'static str),
}

/// Hook run before every navigation.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    async fn before_each(&self, to: &Route, from: Option<&Route>) -> Result<GuardDecision>;
}

/// Sends anonymous users to the login page.
///
/// Protected targets with no cached user trigger one identity check; the cached
/// user then short-circuits every later check in the session.
pub struct AuthGuard {
    accounts: AccountsStore,
}

impl AuthGuard {
    #[must_use]
    pub const fn new(accounts: AccountsStore) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl NavigationGuard for AuthGuard {
    async fn before_each(&self, to: &Route, from: Option<&Route>) -> Result<GuardDecision> {
        let requires_auth = to.requires_auth();
        debug!(
            from = from.map(|r| r.path.as_str()),
            to = %to.path,
            requires_auth,
            "navigation"
        );
        if !requires_auth || self.accounts.is_authenticated().await {
            return Ok(GuardDecision::Proceed);
        }

        debug!("No cached user, checking the current session.");
        if self.accounts.who_am_i().await?.is_some() {
            Ok(GuardDecision::Proceed)
        } else {
            info!("Not authenticated, redirecting {} to login.", to.path);
            Ok(GuardDecision::Redirect(LOGIN))
        }
    }
}
