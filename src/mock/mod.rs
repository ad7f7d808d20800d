//! In-memory development server.
//!
//! [`MockServer`] answers the gfinancas REST surface from fixtures, emulating the
//! cookie session and the server-side business rules. It plugs in as a
//! [`Transport`], so everything above the HTTP layer runs unchanged against it.

mod db;
mod factories;
mod routes;

pub use routes::NO_SESSION;

use crate::config::{Environment, Fixtures};
use crate::errors::{Error, Result};
use crate::http::{ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use db::Database;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct MockServer {
    db: Mutex<Database>,
    requests: Mutex<Vec<(Method, String)>>,
}

impl MockServer {
    /// Seeds a fresh database from `fixtures`.
    #[must_use]
    pub fn new(fixtures: &Fixtures) -> Self {
        let db = Database::seed(fixtures, &mut rand::thread_rng());
        Self {
            db: Mutex::new(db),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The mock server for `env`, refusing to start outside development.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when `env.is_dev` is false.
    pub fn for_environment(env: &Environment, fixtures: &Fixtures) -> Result<Self> {
        if !env.is_dev {
            return Err(Error::Config {
                message: "the mock server is only available in development".to_string(),
            });
        }
        info!("Starting mock API server.");
        Ok(Self::new(fixtures))
    }

    /// Every request seen so far, in order.
    pub async fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.lock().await.clear();
    }

    /// Id of the user the session belongs to.
    pub async fn session_user_id(&self) -> Option<i64> {
        self.db.lock().await.session
    }
}

#[async_trait]
impl Transport for MockServer {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests
            .lock()
            .await
            .push((request.method, request.path.clone()));

        let response = routes::handle(&mut *self.db.lock().await, &request);
        debug!(method = %request.method, path = %request.path, status = response.status, "mock response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    async fn send(server: &MockServer, request: ApiRequest) -> Result<(u16, Value)> {
        let response = server.send(request).await?;
        let body = serde_json::from_str(&response.body).unwrap_or(Value::String(response.body));
        Ok((response.status, body))
    }

    async fn logged_in() -> Result<MockServer> {
        let server = MockServer::new(&Fixtures::embedded()?);
        let (status, _) = send(
            &server,
            ApiRequest::new(Method::Post, "/api/accounts/login")
                .with_body(json!({"username": "admin", "password": "admin123"})),
        )
        .await?;
        assert_eq!(status, 200);
        Ok(server)
    }

    #[tokio::test]
    async fn test_core_routes_require_session() -> Result<()> {
        let server = MockServer::new(&Fixtures::embedded()?);
        let response = server
            .send(ApiRequest::new(Method::Get, "/api/core/departamentos/list"))
            .await?;
        assert_eq!(response.status, 401);
        assert_eq!(response.body, NO_SESSION);
        assert_eq!(server.session_user_id().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_seeded_departamentos_include_generated_ones() -> Result<()> {
        let server = logged_in().await?;
        let (status, body) = send(
            &server,
            ApiRequest::new(Method::Get, "/api/core/departamentos/list"),
        )
        .await?;
        assert_eq!(status, 200);
        let ids: Vec<i64> = body["departamentos"]
            .as_array()
            .map(|deps| deps.iter().filter_map(|d| d["id"].as_i64()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[tokio::test]
    async fn test_despesa_valor_must_be_positive() -> Result<()> {
        let server = logged_in().await?;
        let (status, body) = send(
            &server,
            ApiRequest::new(Method::Post, "/api/core/despesas/add").with_body(json!({
                "departamento_id": 1, "valor": 0, "elemento_id": 1, "tipo_gasto_id": 1,
                "justificativa": "Nada"
            })),
        )
        .await?;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "O valor da despesa deve ser maior que zero.");
        Ok(())
    }

    #[tokio::test]
    async fn test_department_cannot_subordinate_itself() -> Result<()> {
        let server = logged_in().await?;
        let (status, body) = send(
            &server,
            ApiRequest::new(Method::Post, "/api/core/subordinacoes/add").with_body(json!({
                "IdDepartamentoA": 2, "IdDepartamentoB": 2, "Observacao": ""
            })),
        )
        .await?;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Um departamento não pode ser subordinado a si mesmo.");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_ids_answer_404() -> Result<()> {
        let server = logged_in().await?;
        let (status, body) = send(
            &server,
            ApiRequest::new(Method::Delete, "/api/core/verbas/delete/999"),
        )
        .await?;
        assert_eq!(status, 404);
        assert!(body["error"].is_string());

        let (status, _) = send(&server, ApiRequest::new(Method::Get, "/api/core/nada/list")).await?;
        assert_eq!(status, 404);
        Ok(())
    }

    #[tokio::test]
    async fn test_subordinates_appear_on_superior() -> Result<()> {
        let server = logged_in().await?;
        send(
            &server,
            ApiRequest::new(Method::Post, "/api/core/subordinacoes/add").with_body(json!({
                "IdDepartamentoA": 1, "IdDepartamentoB": 2, "Observacao": "Compras"
            })),
        )
        .await?;

        let (_, body) = send(
            &server,
            ApiRequest::new(Method::Get, "/api/core/departamentos/list"),
        )
        .await?;
        assert_eq!(body["departamentos"][0]["subordinacoes"], json!([{"id": 2, "nome": "Compras"}]));
        assert_eq!(body["departamentos"][1]["subordinacoes"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_page_clamps_to_last() -> Result<()> {
        let server = logged_in().await?;
        for valor in [1, 2, 3] {
            send(
                &server,
                ApiRequest::new(Method::Post, "/api/core/despesas/add").with_body(json!({
                    "departamento_id": 1, "valor": valor, "elemento_id": 1, "tipo_gasto_id": 1,
                    "justificativa": "x"
                })),
            )
            .await?;
        }

        let (_, body) = send(
            &server,
            ApiRequest::new(Method::Get, "/api/core/despesas/list")
                .with_query([("page", "9".to_string()), ("per_page", "2".to_string())]),
        )
        .await?;
        assert_eq!(body["paginacao"]["pagina_atual"], 2);
        assert_eq!(body["paginacao"]["total_despesas"], 3);
        assert_eq!(body["paginacao"]["tem_proxima"], false);
        assert_eq!(body["despesas"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[test]
    fn test_refuses_outside_development() -> Result<()> {
        let fixtures = Fixtures::embedded()?;
        let production = Environment::default();
        assert!(matches!(
            MockServer::for_environment(&production, &fixtures),
            Err(Error::Config { .. })
        ));

        let dev = Environment {
            is_dev: true,
            is_mock: true,
            ..Environment::default()
        };
        assert!(MockServer::for_environment(&dev, &fixtures).is_ok());
        Ok(())
    }
}
