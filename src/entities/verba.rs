//! Verba entity - the yearly budget allotted to a department.
//!
//! The server keeps at most one verba per (departamento, ano).

use super::{Record, decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verba {
    pub id: i64,
    #[serde(deserialize_with = "decimal")]
    pub valor: f64,
    pub departamento_id: i64,
    pub ano: i32,
    #[serde(default)]
    pub descricao: String,
    #[serde(rename = "dataAtribuicao", default)]
    pub data_atribuicao: Option<DateTime<Utc>>,
}

impl Record for Verba {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload for `POST /api/core/verbas/add`.
///
/// Fields are optional so a partially filled form can be checked locally;
/// `valor`, `departamento_id` and `ano` must all be set and non-zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewVerba {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ano: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

impl NewVerba {
    #[must_use]
    pub const fn new(valor: f64, departamento_id: i64, ano: i32) -> Self {
        Self {
            valor: Some(valor),
            departamento_id: Some(departamento_id),
            ano: Some(ano),
            descricao: None,
        }
    }

    #[must_use]
    pub fn with_descricao(mut self, descricao: impl Into<String>) -> Self {
        self.descricao = Some(descricao.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VerbaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}
