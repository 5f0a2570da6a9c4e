//! Networking: the configured HTTP client and the backend wire schema.

pub mod api;
pub mod types;
