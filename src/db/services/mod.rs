//! The `services` module provides a high-level API for interacting with the database.
//! It encapsulates the query logic, allowing the HTTP handlers to work with domain
//! models without needing to know about the underlying schema or queries.
//!
//! All public functions from the sub-modules are re-exported here for convenient
//! access under the `crate::db::services::` path.

pub mod tool_service;
pub mod user_service;

pub use tool_service::*;
pub use user_service::*;
