//! Typed HTTP client for the gfinancas API.
//!
//! Turns non-2xx answers into [`Error::Http`] carrying the status and the server's
//! message, and decodes 2xx bodies into the caller's type.

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::errors::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client wrapper shared by every API module.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::new(Method::Get, path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<T> {
        self.execute(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(to_json(path, body)?);
        self.execute(request).await
    }

    /// POST without a body (logout).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::new(Method::Post, path)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(to_json(path, body)?);
        self.execute(request).await
    }

    /// DELETE; whatever body the server sends back is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send_checked(ApiRequest::new(Method::Delete, path))
            .await
            .map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let path = request.path.clone();
        let resp = self.send_checked(request).await?;
        serde_json::from_str(&resp.body).map_err(|source| Error::Decode { path, source })
    }

    async fn send_checked(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "api request");

        let resp = self.transport.send(request).await.inspect_err(|e| {
            warn!(%method, %path, error = %e, "api request failed before a response");
        })?;

        if !resp.is_success() {
            let message = server_message(&resp.body);
            warn!(%method, %path, status = resp.status, ?message, "api request rejected");
            return Err(Error::Http {
                status: resp.status,
                message,
            });
        }
        Ok(resp)
    }
}

fn to_json<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}

/// Message the server attached to a failure: the JSON `error`, `message` or
/// `detail` field, else the raw text body.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["error", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Answers every request with a fixed response and remembers what it saw.
    struct FixedTransport {
        response: ApiResponse,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl FixedTransport {
        fn new(response: ApiResponse) -> Arc<Self> {
            Arc::new(Self {
                response,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.seen.lock().await.push(request);
            Ok(self.response.clone())
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: i64,
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"error": "Departamento não encontrado."}"#).as_deref(),
            Some("Departamento não encontrado.")
        );
        assert_eq!(
            server_message(r#"{"message": "Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(
            server_message("Header de segurança não encontrado").as_deref(),
            Some("Header de segurança não encontrado")
        );
        assert_eq!(server_message(r#"{"other": 1}"#), None);
        assert_eq!(server_message("   "), None);
    }

    #[tokio::test]
    async fn test_success_decodes_body() -> Result<()> {
        let transport = FixedTransport::new(ApiResponse::json(200, &json!({"id": 9})));
        let client = ApiClient::new(transport.clone());

        let payload: Payload = client.post("/api/core/verbas/add", &json!({"ano": 2024})).await?;
        assert_eq!(payload, Payload { id: 9 });

        let seen = transport.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(seen[0].body, Some(json!({"ano": 2024})));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_success_carries_status_and_message() {
        let transport =
            FixedTransport::new(ApiResponse::json(404, &json!({"error": "Verba não encontrada."})));
        let client = ApiClient::new(transport);

        let result: Result<Payload> = client.get("/api/core/verbas/list").await;
        match result {
            Err(Error::Http { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message.as_deref(), Some("Verba não encontrada."));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let transport = FixedTransport::new(ApiResponse::text(200, "<html>"));
        let client = ApiClient::new(transport);

        let result: Result<Payload> = client.get("/api/accounts/whoami").await;
        assert!(matches!(result, Err(Error::Decode { ref path, .. }) if path == "/api/accounts/whoami"));
    }

    #[tokio::test]
    async fn test_delete_ignores_body() -> Result<()> {
        let transport = FixedTransport::new(ApiResponse::text(204, ""));
        let client = ApiClient::new(transport);
        client.delete("/api/core/despesas/delete/42").await
    }
}
