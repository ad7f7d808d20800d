//! TipoGasto entity - expense types nested under an Elemento.

use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoGasto {
    pub id: i64,
    #[serde(rename = "tipoGasto")]
    pub tipo_gasto: String,
    #[serde(default)]
    pub descricao: String,
    /// Set when the server lists types for a specific elemento
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elemento_id: Option<i64>,
}

impl Record for TipoGasto {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TipoGastoInput {
    #[serde(rename = "tipoGasto", skip_serializing_if = "Option::is_none")]
    pub tipo_gasto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elemento_id: Option<i64>,
}
