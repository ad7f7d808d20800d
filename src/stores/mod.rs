//! State stores - per-domain caches of server data.
//!
//! Stores are explicit context objects: cheap to clone, shared through
//! `Arc<RwLock<_>>`, and never holding a lock across a network await. Two actions
//! on the same store can therefore only interleave at their requests.

/// Id-addressed collection cache with loading state
pub mod cache;

/// Session user, users and roles
pub mod accounts;

/// Departamentos, elementos, tipos de gasto, despesas, verbas, subordinações, responsabilidades
pub mod core;

/// Shared UI notification store (error banner and snackbar)
pub mod notifications;

pub use accounts::AccountsStore;
pub use cache::{Collection, LoadState};
pub use core::CoreStore;
pub use notifications::{Notification, NotificationStore, Severity};
