//! Auth service: login, registration and logout.
//!
//! Login posts form-encoded credentials (the backend speaks the OAuth2
//! password form); registration posts JSON. Registration payloads can be
//! checked locally with [`validate_registration`] before they hit the wire.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::{MessageResponse, Token, UserCreate, UserRead};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Minimum age accepted at registration.
pub const MINIMUM_AGE_YEARS: i32 = 18;

#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `POST /auth/login` with form-encoded `username` and `password`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let form = [("username", username), ("password", password)];
        let request = self.api.post(LOGIN_PATH).form(&form);
        self.api
            .send_json(request)
            .await
            .inspect_err(|error| tracing::error!(%error, "error during login"))
    }

    /// `POST /auth/register` with a JSON `UserCreate`; returns the created user.
    pub async fn register(&self, user_data: &UserCreate) -> Result<UserRead, ApiError> {
        let request = self.api.post(REGISTER_PATH).json(user_data);
        self.api
            .send_json(request)
            .await
            .inspect_err(|error| tracing::error!(%error, "error during registration"))
    }

    /// `POST /auth/logout`. Tokens are stateless on the backend, so the caller
    /// still has to drop its token from the session store.
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(self.api.post(LOGOUT_PATH))
            .await
            .inspect_err(|error| tracing::error!(%error, "error during logout"))
    }
}

// =============================================================================
// LOCAL VALIDATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("birth date must be YYYY-MM-DD, got {0:?}")]
    InvalidBirthDate(String),
    #[error("birth date cannot be in the future")]
    BirthDateInFuture,
    #[error("you must be at least {min} years old to register (age {age})", min = MINIMUM_AGE_YEARS)]
    Underage { age: i32 },
}

/// Check a registration payload against the backend's acceptance rules as of
/// `today`. Returns the parsed birth date.
pub fn validate_registration(user_data: &UserCreate, today: Date) -> Result<Date, RegistrationError> {
    if user_data.email.trim().is_empty() {
        return Err(RegistrationError::MissingEmail);
    }
    if user_data.password.is_empty() {
        return Err(RegistrationError::MissingPassword);
    }
    let birth_date = parse_birth_date(&user_data.birth_date)?;
    if birth_date > today {
        return Err(RegistrationError::BirthDateInFuture);
    }
    let age = age_on(birth_date, today);
    if age < MINIMUM_AGE_YEARS {
        return Err(RegistrationError::Underage { age });
    }
    Ok(birth_date)
}

/// [`validate_registration`] against the current UTC date.
pub fn validate_registration_now(user_data: &UserCreate) -> Result<Date, RegistrationError> {
    validate_registration(user_data, OffsetDateTime::now_utc().date())
}

pub fn parse_birth_date(raw: &str) -> Result<Date, RegistrationError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| RegistrationError::InvalidBirthDate(raw.to_owned()))
}

/// Whole years between `birth_date` and `today`.
#[must_use]
pub fn age_on(birth_date: Date, today: Date) -> i32 {
    let had_birthday = (u8::from(today.month()), today.day()) >= (u8::from(birth_date.month()), birth_date.day());
    today.year() - birth_date.year() - i32::from(!had_birthday)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
