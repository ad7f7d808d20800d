//! Unified error types for the admin client.
//!
//! Transport failures, HTTP status failures, server-declared domain errors and
//! local precondition violations are kept apart so callers can tell whether a
//! request ever left the process.

use thiserror::Error;

/// Generic message used when the server rejects a mutation without an `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Não foi possível concluir a operação.";

/// Local precondition violations, raised before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },

    #[error("`{field}` must be a positive id")]
    InvalidId { field: &'static str },

    #[error("`{field}` must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("`{field}` is {len} characters long, the limit is {max}")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("a department cannot be subordinate to itself")]
    SameDepartment,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Http { status: u16, message: Option<String> },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("No route matches {path}")]
    NoRoute { path: String },

    #[error("Navigation to {path} kept redirecting")]
    RedirectLoop { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Re-wraps an HTTP failure with the server's `error` message, or `fallback` when
    /// the server sent none. Other errors pass through unchanged.
    #[must_use]
    pub fn into_server_error(self, fallback: &str) -> Self {
        match self {
            Self::Http { status, message } => Self::Server {
                status,
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            other => other,
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_server_error_uses_server_message() {
        let err = Error::Http {
            status: 400,
            message: Some("Já existe uma verba".to_string()),
        }
        .into_server_error(GENERIC_SERVER_ERROR);

        assert!(matches!(err, Error::Server { status: 400, .. }));
        assert_eq!(err.to_string(), "Já existe uma verba");
    }

    #[test]
    fn test_into_server_error_falls_back_to_generic_message() {
        let err = Error::Http {
            status: 500,
            message: None,
        }
        .into_server_error(GENERIC_SERVER_ERROR);

        assert_eq!(err.to_string(), GENERIC_SERVER_ERROR);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_validation_errors_are_not_rewrapped() {
        let err = Error::from(ValidationError::Missing { field: "ano" })
            .into_server_error(GENERIC_SERVER_ERROR);
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Missing { field: "ano" })
        ));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_is_unauthorized() {
        let err = Error::Http {
            status: 401,
            message: None,
        };
        assert!(err.is_unauthorized());
        assert!(!Error::Config {
            message: String::new()
        }
        .is_unauthorized());
    }
}
