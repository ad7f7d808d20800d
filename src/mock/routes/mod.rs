//! Request dispatch for the mock server.

mod accounts;
mod core;

use super::db::Database;
use crate::http::{ApiRequest, ApiResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Plain-text body the server sends when the session cookie is missing.
pub const NO_SESSION: &str = "Header de segurança não encontrado";

/// A handler's early exit, already shaped as the response to send.
#[derive(Debug)]
pub(crate) struct Reject(ApiResponse);

impl Reject {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self(ApiResponse::json(400, &json!({ "error": message.into() })))
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self(ApiResponse::json(404, &json!({ "error": message.into() })))
    }

    /// Failed login.
    pub(crate) fn unauthorized() -> Self {
        Self(ApiResponse::json(401, &json!({ "message": "Unauthorized" })))
    }

    pub(crate) fn no_session() -> Self {
        Self(ApiResponse::text(401, NO_SESSION))
    }
}

pub(crate) type Reply = Result<Value, Reject>;

pub(crate) fn handle(db: &mut Database, request: &ApiRequest) -> ApiResponse {
    let path = request.path.split('?').next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let reply = match segments.as_slice() {
        ["api", "accounts", rest @ ..] => accounts::handle(db, request, rest),
        ["api", "core", rest @ ..] => match db.session {
            Some(user_id) => core::handle(db, request, user_id, rest),
            None => Err(Reject::no_session()),
        },
        _ => Err(route_not_found(request)),
    };

    match reply {
        Ok(body) => ApiResponse::json(200, &body),
        Err(Reject(response)) => response,
    }
}

pub(crate) fn route_not_found(request: &ApiRequest) -> Reject {
    Reject::not_found(format!(
        "Rota não encontrada: {} {}",
        request.method, request.path
    ))
}

/// Decodes the request body; a missing body reads as `{}`.
pub(crate) fn body<T: DeserializeOwned>(request: &ApiRequest) -> Result<T, Reject> {
    let value = request.body.clone().unwrap_or_else(|| json!({}));
    serde_json::from_value(value)
        .map_err(|e| Reject::bad_request(format!("Requisição inválida: {e}")))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Reply {
    serde_json::to_value(value).map_err(|e| {
        Reject(ApiResponse::json(
            500,
            &json!({ "error": format!("Falha ao serializar resposta: {e}") }),
        ))
    })
}

pub(crate) fn parse_id(raw: &str) -> Result<i64, Reject> {
    raw.parse()
        .map_err(|_| Reject::not_found(format!("Identificador inválido: {raw}")))
}
