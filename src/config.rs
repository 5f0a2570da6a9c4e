//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const STATE_DIR_NAME: &str = ".astrodate";
pub const STATE_FILE_NAME: &str = "state.json";

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0} (expected http:// or https://)")]
    InvalidBaseUrl(String),

    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Optional per-request timeouts. `None` leaves the transport default (no timeout).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub state_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config pointing at `base_url` with the default state file and no timeouts.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            state_file: default_state_file(std::env::var("HOME").ok().as_deref()),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `ASTRODATE_BASE_URL`: default `http://localhost:8000`
    /// - `ASTRODATE_STATE_FILE`: default `$HOME/.astrodate/state.json`
    /// - `ASTRODATE_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `ASTRODATE_CONNECT_TIMEOUT_SECS`: unset means no timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(var("ASTRODATE_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let state_file = var("ASTRODATE_STATE_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| default_state_file(var("HOME").as_deref()), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: parse_secs("ASTRODATE_REQUEST_TIMEOUT_SECS", var("ASTRODATE_REQUEST_TIMEOUT_SECS"))?,
            connect_secs: parse_secs("ASTRODATE_CONNECT_TIMEOUT_SECS", var("ASTRODATE_CONNECT_TIMEOUT_SECS"))?,
        };

        Ok(Self { base_url, state_file, timeouts })
    }

    /// Replace the base URL, validating it the same way as the environment value.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_state_file(mut self, state_file: impl Into<PathBuf>) -> Self {
        self.state_file = state_file.into();
        self
    }
}

/// Trim whitespace and trailing slashes; reject anything that is not http(s).
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_state_file(home: Option<&str>) -> PathBuf {
    let root = home.filter(|h| !h.is_empty()).map_or_else(|| PathBuf::from("."), PathBuf::from);
    root.join(STATE_DIR_NAME).join(STATE_FILE_NAME)
}

fn parse_secs(var: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw.clone() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
