//! Departamento entity - organizational units that receive verbas and record despesas.

use super::{Record, null_as_default};
use serde::{Deserialize, Serialize};

/// Short reference to a department, as nested inside other records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartamentoRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Departamento {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "tipoEntidade", default, deserialize_with = "null_as_default")]
    pub tipo_entidade: String,
    #[serde(rename = "responsavelId", default)]
    pub responsavel_id: Option<i64>,
    #[serde(default)]
    pub done: bool,
    /// Departments directly subordinate to this one
    #[serde(default, deserialize_with = "null_as_default")]
    pub subordinacoes: Vec<DepartamentoRef>,
}

impl Record for Departamento {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Body for creating or updating a department. Absent fields are left to the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DepartamentoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "tipoEntidade", skip_serializing_if = "Option::is_none")]
    pub tipo_entidade: Option<String>,
    #[serde(rename = "responsavelId", skip_serializing_if = "Option::is_none")]
    pub responsavel_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_skips_absent_fields() {
        let input = DepartamentoInput {
            description: Some("Compras".to_string()),
            responsavel_id: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"description": "Compras", "responsavelId": 2})
        );
    }

    #[test]
    fn test_departamento_without_subordinacoes() {
        let dep: Departamento = serde_json::from_value(json!({
            "id": 3, "nome": "TI", "description": "Tecnologia",
            "tipoEntidade": "Setor", "responsavelId": 1, "done": false
        }))
        .unwrap();
        assert_eq!(dep.tipo_entidade, "Setor");
        assert!(dep.subordinacoes.is_empty());
    }
}
