//! Wire DTOs for the AstroDate backend.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON exactly (snake_case) so payloads
//! pass through the services unmodified.

use serde::{Deserialize, Serialize};

/// Token pair returned by `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Registration payload for `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
}

/// A user as returned by the backend. Read-only on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub email: String,
    pub birth_date: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub zodiac_sign_id: Option<i64>,
    #[serde(default)]
    pub zodiac_sign_name: Option<String>,
}

/// Result of `POST /users/swipe/{id}/{is_like}`. `match_id` is present only
/// when the like completed a mutual match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeOutcome {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i64>,
}

impl SwipeOutcome {
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.match_id.is_some()
    }
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
