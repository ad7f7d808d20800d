//! HTTP layer for the gfinancas API.
//!
//! [`Transport`] is the seam between the typed [`ApiClient`] and whatever carries
//! the bytes: [`ReqwestTransport`] against a real server, or the in-memory mock
//! server during development.

pub mod client;
pub mod transport;

pub use client::ApiClient;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
