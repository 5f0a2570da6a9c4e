//! AstroDate client: session, HTTP and routing core of the dating app client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views (the `astrodate` CLI here) call the domain services in `services`,
//! which send requests through the configured `net::api::ApiClient`. The
//! client's bearer interceptor reads the `session::SessionStore` on every
//! request, and the `router` consults the same store before each navigation.

pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod router;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClientConfig;
pub use error::ApiError;
pub use net::api::ApiClient;
pub use router::Router;
pub use services::{AuthService, UserService};
pub use session::SessionStore;
