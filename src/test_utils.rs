//! Shared test utilities for the admin client.
//!
//! Every helper builds on a fresh [`MockServer`] seeded from the embedded
//! fixtures, so tests never share state or touch the network.

use crate::{
    config::Fixtures,
    entities::NewDespesa,
    errors::Result,
    http::{ApiClient, ApiRequest, ApiResponse, Transport},
    mock::MockServer,
    session::AppContext,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Credentials of the admin user in `fixtures/mock.toml`.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A mock server with the embedded fixtures and no session.
pub fn mock_server() -> Result<Arc<MockServer>> {
    Ok(Arc::new(MockServer::new(&Fixtures::embedded()?)))
}

/// An API client talking to a fresh mock server.
/// Returns (client, server) so tests can inspect the requests made.
pub fn mock_client() -> Result<(ApiClient, Arc<MockServer>)> {
    let server = mock_server()?;
    let transport: Arc<MockServer> = Arc::clone(&server);
    Ok((ApiClient::new(transport), server))
}

/// Same as [`mock_client`], with the admin session already open.
pub async fn mock_client_logged_in() -> Result<(ApiClient, Arc<MockServer>)> {
    let (client, server) = mock_client()?;
    crate::api::accounts::login(&client, ADMIN_USERNAME, ADMIN_PASSWORD).await?;
    Ok((client, server))
}

/// A full application context over a fresh mock server, nobody logged in.
pub fn mock_context() -> Result<(AppContext, Arc<MockServer>)> {
    let server = mock_server()?;
    let transport: Arc<MockServer> = Arc::clone(&server);
    Ok((AppContext::new(transport), server))
}

/// Same as [`mock_context`], logged in as admin through the accounts store.
pub async fn logged_in_context() -> Result<(AppContext, Arc<MockServer>)> {
    let (ctx, server) = mock_context()?;
    ctx.accounts.login(ADMIN_USERNAME, ADMIN_PASSWORD).await?;
    Ok((ctx, server))
}

/// A transport whose requests never complete, for actions abandoned mid-request.
pub struct Stalled;

#[async_trait]
impl Transport for Stalled {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse> {
        std::future::pending().await
    }
}

/// A context over [`Stalled`].
pub fn stalled_context() -> AppContext {
    AppContext::new(Arc::new(Stalled))
}

/// Polls `action` once, then drops it while its request is still in flight.
/// Returns `true` when the action was indeed still pending.
pub async fn poll_once_then_drop<F: std::future::Future>(action: F) -> bool {
    tokio::select! {
        biased;
        _ = action => false,
        () = std::future::ready(()) => true,
    }
}

/// A valid despesa for departamento 1 under the first elemento and tipo de gasto.
///
/// # Defaults
/// * `justificativa`: `"Despesa de teste"`
/// * `user_id`: None (the server uses the session user)
#[must_use]
pub fn sample_despesa(valor: f64) -> NewDespesa {
    NewDespesa {
        departamento_id: 1,
        valor,
        elemento_id: 1,
        tipo_gasto_id: 1,
        user_id: None,
        justificativa: "Despesa de teste".to_string(),
    }
}
