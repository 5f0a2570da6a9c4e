//! Domain services: typed wrappers around backend endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views call these; each method sends exactly one request through the shared
//! `ApiClient`, logs failures and hands the error back unchanged. Applying a
//! login result to the session store is the caller's job.

pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::UserService;
