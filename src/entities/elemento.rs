//! Elemento entity - top-level expense categories.

use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elemento {
    pub id: i64,
    pub elemento: String,
    #[serde(default)]
    pub descricao: String,
}

impl Record for Elemento {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElementoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elemento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}
