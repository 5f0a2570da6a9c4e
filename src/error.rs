//! Error type shared by the HTTP client and the domain services.
//!
//! Transport failures and non-2xx backend responses are both surfaced as
//! `ApiError`; service callers do not need to tell them apart, but
//! [`ApiError::status`] exposes the HTTP status whenever one is known.

use reqwest::StatusCode;

use crate::config::ConfigError;

/// Errors produced while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client configuration was rejected before any request was made.
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(reqwest::Error),

    /// The request could not be built or the transport failed.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body did not match the expected schema.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status attached to this error, if the backend produced one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(error) => error.status(),
            Self::Config(_) | Self::ClientBuild(_) | Self::Decode(_) => None,
        }
    }

    /// `true` when the backend rejected the credential (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
