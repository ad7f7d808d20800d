//! Subordinacao entity - a reporting link from a subordinate department to its superior.

use super::{DepartamentoRef, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subordinacao {
    pub id: i64,
    /// Superior department
    #[serde(rename = "IdDepartamentoA")]
    pub superior: DepartamentoRef,
    /// Subordinate department
    #[serde(rename = "IdDepartamentoB")]
    pub subordinado: DepartamentoRef,
    #[serde(rename = "dataSubordinacao", default)]
    pub data: Option<DateTime<Utc>>,
    #[serde(rename = "Observacao", default)]
    pub observacao: Option<String>,
}

impl Record for Subordinacao {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewSubordinacao {
    #[serde(rename = "IdDepartamentoA")]
    pub superior_id: i64,
    #[serde(rename = "IdDepartamentoB")]
    pub subordinado_id: i64,
    #[serde(rename = "Observacao")]
    pub observacao: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubordinacaoUpdate {
    #[serde(rename = "Observacao")]
    pub observacao: String,
}
