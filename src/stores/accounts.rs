//! Accounts store - the session user plus cached users and roles.

use super::cache::{Collection, LoadGuard};
use super::notifications::{NotificationStore, Severity};
use crate::api::accounts;
use crate::entities::{NewUser, Role, User};
use crate::errors::Result;
use crate::http::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

const INVALID_CREDENTIALS: &str = "Usuário ou senha inválidos.";

#[derive(Debug, Default)]
struct State {
    loading: bool,
    logged_user: Option<User>,
    users: Collection<User>,
    roles: Vec<Role>,
    error: Option<String>,
}

fn release_loading(state: &mut State) {
    state.loading = false;
}

#[derive(Clone)]
pub struct AccountsStore {
    api: ApiClient,
    notifications: NotificationStore,
    state: Arc<RwLock<State>>,
}

impl AccountsStore {
    #[must_use]
    pub fn new(api: ApiClient, notifications: NotificationStore) -> Self {
        Self {
            api,
            notifications,
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Asks the server who owns the current session and caches the answer.
    ///
    /// The cached user is cleared unless the server reports an authenticated user.
    /// On a failed request the previous user is kept and the error is returned.
    pub async fn who_am_i(&self) -> Result<Option<User>> {
        self.state.write().await.loading = true;
        let guard = LoadGuard::new(&self.state, release_loading);
        let result = accounts::whoami(&self.api).await;

        let mut state = self.state.write().await;
        guard.disarm();
        state.loading = false;
        match result {
            Ok(answer) => {
                state.logged_user = answer.into_user();
                info!(user = ?state.logged_user.as_ref().map(|u| &u.username), "identity checked");
                Ok(state.logged_user.clone())
            }
            Err(e) => {
                error!("Identity check failed: {}", e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        self.state.write().await.loading = true;
        let guard = LoadGuard::new(&self.state, release_loading);
        let result = accounts::login(&self.api, username, password).await;

        let mut state = self.state.write().await;
        guard.disarm();
        state.loading = false;
        match result {
            Ok(user) => {
                info!("User {} logged in.", user.username);
                state.logged_user = Some(user.clone());
                state.error = None;
                drop(state);
                self.notifications.set_error_message(None).await;
                Ok(user)
            }
            Err(e) => {
                warn!("Login failed for {}: {}", username, e);
                let message = if e.is_unauthorized() {
                    INVALID_CREDENTIALS.to_string()
                } else {
                    e.to_string()
                };
                state.error = Some(message.clone());
                drop(state);
                self.notifications.set_error_message(Some(message)).await;
                Err(e)
            }
        }
    }

    /// Ends the session. Returns `true` once the server no longer reports it authenticated.
    pub async fn logout(&self) -> Result<bool> {
        self.state.write().await.loading = true;
        let guard = LoadGuard::new(&self.state, release_loading);
        let result = accounts::logout(&self.api).await;

        let mut state = self.state.write().await;
        guard.disarm();
        state.loading = false;
        match result {
            Ok(resp) if !resp.authenticated => {
                info!("Logged out.");
                state.logged_user = None;
                drop(state);
                self.notifications
                    .show_snackbar("Sessão encerrada.", Severity::Info)
                    .await;
                Ok(true)
            }
            Ok(_) => {
                warn!("Server kept the session open after logout.");
                drop(state);
                self.notifications
                    .show_snackbar("A sessão continua ativa no servidor.", Severity::Warning)
                    .await;
                Ok(false)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.state.write().await.users.begin_load();
        let guard = LoadGuard::new(&self.state, |s: &mut State| s.users.cancel_load());
        let result = accounts::list_users(&self.api).await;

        let mut state = self.state.write().await;
        guard.disarm();
        match result {
            Ok(users) => {
                info!("Users cache refreshed with {} items.", users.len());
                state.users.replace(users.clone());
                Ok(users)
            }
            Err(e) => {
                error!("Failed to list users: {}", e);
                state.users.fail(e.to_string());
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.state.write().await.loading = true;
        let guard = LoadGuard::new(&self.state, release_loading);
        let result = accounts::list_roles(&self.api).await;

        let mut state = self.state.write().await;
        guard.disarm();
        state.loading = false;
        match result {
            Ok(roles) => {
                state.roles.clone_from(&roles);
                Ok(roles)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn add_user(&self, new_user: &NewUser) -> Result<User> {
        match accounts::add_user(&self.api, new_user).await {
            Ok(user) => {
                self.state.write().await.users.append(user.clone());
                self.notifications
                    .show_snackbar("Usuário criado com sucesso.", Severity::Success)
                    .await;
                Ok(user)
            }
            Err(e) => {
                self.state.write().await.error = Some(e.to_string());
                self.notifications
                    .show_snackbar(e.to_string(), Severity::Error)
                    .await;
                Err(e)
            }
        }
    }

    pub async fn logged_user(&self) -> Option<User> {
        self.state.read().await.logged_user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.logged_user.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn users(&self) -> Collection<User> {
        self.state.read().await.users.clone()
    }

    pub async fn roles(&self) -> Vec<Role> {
        self.state.read().await.roles.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
