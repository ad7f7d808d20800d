//! Domain API modules.
//!
//! Each function maps one named operation to exactly one request and unwraps the
//! endpoint's envelope. Preconditions live in [`validation`] and run before the
//! request is built. Nothing here touches a store.

pub mod accounts;
pub mod core;
pub mod validation;
