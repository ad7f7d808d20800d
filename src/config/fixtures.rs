//! Mock server fixtures loaded from TOML.
//!
//! The default fixtures are compiled into the binary from `fixtures/mock.toml`;
//! `GFINANCAS_MOCK_FIXTURES` points at a different file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const ENV_MOCK_FIXTURES: &str = "GFINANCAS_MOCK_FIXTURES";

const DEFAULT_FIXTURES: &str = include_str!("../../fixtures/mock.toml");

/// Seed data for the mock server
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Fixtures {
    /// Extra departments produced by the factory
    #[serde(default)]
    pub generated_departamentos: usize,
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub roles: Vec<RoleFixture>,
    #[serde(default)]
    pub departamentos: Vec<DepartamentoFixture>,
    #[serde(default)]
    pub elementos: Vec<ElementoFixture>,
    #[serde(default)]
    pub tipos_gasto: Vec<TipoGastoFixture>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserFixture {
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grupo: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub staff: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoleFixture {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DepartamentoFixture {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tipo_entidade: String,
    #[serde(default)]
    pub responsavel_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ElementoFixture {
    pub id: i64,
    pub elemento: String,
    #[serde(default)]
    pub descricao: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TipoGastoFixture {
    pub id: i64,
    pub tipo_gasto: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub elemento_id: Option<i64>,
}

impl Fixtures {
    /// Parses fixtures from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Into::into)
    }

    /// Loads fixtures from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        tracing::debug!("Loading mock fixtures from: {:?}", path_ref);
        let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
            message: format!("Failed to read fixtures file {path_ref:?}: {e}"),
        })?;
        Self::from_toml(&contents)
    }

    /// The fixtures shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_FIXTURES)
    }

    /// `GFINANCAS_MOCK_FIXTURES` when set, the embedded fixtures otherwise.
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(ENV_MOCK_FIXTURES) {
            Ok(path) => Self::load(path),
            Err(std::env::VarError::NotPresent) => Self::embedded(),
            Err(e) => Err(e.into()),
        }
    }
}
