//! Runtime environment for the admin client.
//!
//! Values come from environment variables (usually loaded from `.env` by the
//! binary). Construction goes through a lookup function so tests can supply
//! variables without touching the process environment.

use crate::errors::{Error, Result};

pub const ENV_MODE: &str = "GFINANCAS_ENV";
pub const ENV_API_MOCK: &str = "GFINANCAS_API_MOCK";
pub const ENV_API_BASE_URL: &str = "GFINANCAS_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// `GFINANCAS_ENV=development`
    pub is_dev: bool,
    /// `GFINANCAS_API_MOCK=true`: serve the API from the in-memory mock server
    pub is_mock: bool,
    pub api_base_url: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            is_dev: false,
            is_mock: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Environment {
    /// Reads the environment of the current process.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the environment from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the mock server is requested outside development
    /// or the base URL is not an http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_dev = lookup(ENV_MODE).is_some_and(|v| v.trim().eq_ignore_ascii_case("development"));
        let is_mock = lookup(ENV_API_MOCK).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        let api_base_url = lookup(ENV_API_BASE_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if is_mock && !is_dev {
            return Err(Error::Config {
                message: format!("{ENV_API_MOCK}=true is only allowed when {ENV_MODE}=development"),
            });
        }
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(Error::Config {
                message: format!("{ENV_API_BASE_URL} must be an http(s) URL, got {api_base_url:?}"),
            });
        }

        tracing::debug!(is_dev, is_mock, %api_base_url, "environment resolved");
        Ok(Self {
            is_dev,
            is_mock,
            api_base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() -> Result<()> {
        let env = Environment::from_lookup(lookup(&[]))?;
        assert_eq!(env, Environment::default());
        Ok(())
    }

    #[test]
    fn test_development_with_mock() -> Result<()> {
        let env = Environment::from_lookup(lookup(&[
            (ENV_MODE, "development"),
            (ENV_API_MOCK, "true"),
            (ENV_API_BASE_URL, "https://gfinancas.example.org"),
        ]))?;
        assert!(env.is_dev);
        assert!(env.is_mock);
        assert_eq!(env.api_base_url, "https://gfinancas.example.org");
        Ok(())
    }

    #[test]
    fn test_mock_outside_development_is_rejected() {
        let result = Environment::from_lookup(lookup(&[(ENV_API_MOCK, "true")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = Environment::from_lookup(lookup(&[(ENV_API_BASE_URL, "localhost:8000")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
