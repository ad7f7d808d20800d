/// Runtime environment: API base URL, development and mock switches
pub mod environment;

/// Mock server fixtures loaded from TOML
pub mod fixtures;

pub use environment::Environment;
pub use fixtures::Fixtures;
