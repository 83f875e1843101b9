//! Adapters for external systems.
//!
//! The documentation server is not part of this crate; the adapter here
//! speaks its version endpoint and its bearer-token authentication.

pub mod api;

pub use api::{ApiClient, ApiError, VersionInfo};
