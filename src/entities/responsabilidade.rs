//! Responsabilidade entity - a user's responsibility over a department.

use super::{DepartamentoRef, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioRef {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Responsabilidade {
    pub id: i64,
    pub usuario: UsuarioRef,
    pub departamento: DepartamentoRef,
    #[serde(default)]
    pub data_criacao: Option<DateTime<Utc>>,
    #[serde(default)]
    pub observacao: Option<String>,
}

impl Record for Responsabilidade {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Both ids are required; they stay optional here so a missing one is reported locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewResponsabilidade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_id: Option<i64>,
    pub observacao: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResponsabilidadeUpdate {
    pub observacao: String,
}
