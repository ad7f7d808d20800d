//! Despesa entity - individual expenditures recorded against a department.
//!
//! Despesa listings are paginated by the server; [`DespesasPage`] carries one page
//! and its [`Paginacao`] block.

use super::{Record, decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Despesa {
    pub id: i64,
    #[serde(deserialize_with = "decimal")]
    pub valor: f64,
    pub departamento_id: i64,
    #[serde(default)]
    pub elemento_id: Option<i64>,
    #[serde(default)]
    pub tipo_gasto_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub justificativa: String,
    /// When the expenditure was recorded
    #[serde(default)]
    pub data: Option<DateTime<Utc>>,
}

impl Record for Despesa {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewDespesa {
    pub departamento_id: i64,
    pub valor: f64,
    pub elemento_id: i64,
    pub tipo_gasto_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub justificativa: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DespesaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elemento_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_gasto_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justificativa: Option<String>,
}

/// Page selection passed through to the server unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginacao {
    #[serde(default)]
    pub pagina_atual: u32,
    pub total_paginas: u32,
    #[serde(default)]
    pub total_despesas: u64,
    #[serde(default)]
    pub tem_proxima: bool,
    #[serde(default)]
    pub tem_anterior: bool,
}

/// Envelope of `GET /api/core/despesas/list`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DespesasPage {
    pub despesas: Vec<Despesa>,
    pub paginacao: Paginacao,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TotalDespesas {
    pub departamento_id: i64,
    #[serde(deserialize_with = "decimal")]
    pub total: f64,
}
