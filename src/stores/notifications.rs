//! Shared notification store.
//!
//! Store actions report outcomes here as a side effect; the front end shows the
//! error banner and the snackbar from this state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
struct State {
    error_message: Option<String>,
    show_error_message: bool,
    snackbar: Option<Notification>,
    show_snackbar: bool,
    history: Vec<Notification>,
}

#[derive(Clone, Default)]
pub struct NotificationStore {
    state: Arc<RwLock<State>>,
}

impl NotificationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error banner; an empty message hides it.
    pub async fn set_error_message(&self, message: Option<String>) {
        info!(?message, "setting error message");
        let mut state = self.state.write().await;
        state.show_error_message = message.as_deref().is_some_and(|m| !m.is_empty());
        state.error_message = message;
    }

    pub async fn show_snackbar(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification {
            message: message.into(),
            severity,
        };
        info!(message = %notification.message, ?severity, "showing snackbar");
        let mut state = self.state.write().await;
        state.show_snackbar = !notification.message.is_empty();
        state.snackbar = Some(notification.clone());
        state.history.push(notification);
    }

    pub async fn dismiss_snackbar(&self) {
        self.state.write().await.show_snackbar = false;
    }

    pub async fn error_message(&self) -> Option<String> {
        let state = self.state.read().await;
        state
            .show_error_message
            .then(|| state.error_message.clone())
            .flatten()
    }

    /// The visible snackbar, if any.
    pub async fn snackbar(&self) -> Option<Notification> {
        let state = self.state.read().await;
        state.show_snackbar.then(|| state.snackbar.clone()).flatten()
    }

    pub async fn history(&self) -> Vec<Notification> {
        self.state.read().await.history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snackbar_visibility_and_history() {
        let store = NotificationStore::new();
        assert!(store.snackbar().await.is_none());

        store.show_snackbar("Verba criada", Severity::Success).await;
        let shown = store.snackbar().await;
        assert_eq!(
            shown,
            Some(Notification {
                message: "Verba criada".to_string(),
                severity: Severity::Success
            })
        );

        store.dismiss_snackbar().await;
        assert!(store.snackbar().await.is_none());
        assert_eq!(store.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_error_message_hides_banner() {
        let store = NotificationStore::new();
        store
            .set_error_message(Some("Usuário ou senha inválidos".to_string()))
            .await;
        assert_eq!(
            store.error_message().await.as_deref(),
            Some("Usuário ou senha inválidos")
        );

        store.set_error_message(Some(String::new())).await;
        assert!(store.error_message().await.is_none());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
