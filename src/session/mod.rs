//! Session store: the single source of truth for "is this client logged in"
//! and "which credential do we present".
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer interceptor in `net::api` reads `token()` before every request
//! and the router guard reads `is_authenticated_or_stored()` before every navigation.
//! Views mutate the store only on explicit login/logout.
//!
//! The authenticated flag is independent of the token: the flag
//! may be flipped before or after a token materializes, and the guard falls
//! back to the durable token when the flag is not set.

pub mod storage;

use std::sync::{Arc, PoisonError, RwLock};

use storage::{DurableStorage, TOKEN_KEY};

/// In-memory view of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub authenticated: bool,
}

/// Cloneable handle to the shared session. Clones observe the same state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn DurableStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("SessionStore")
            .field("has_token", &state.token.is_some())
            .field("authenticated", &state.authenticated)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store seeded from durable storage: a stored token becomes the
    /// in-memory token and marks the session authenticated.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        let token = storage.get_item(TOKEN_KEY);
        let authenticated = token.is_some();
        if authenticated {
            tracing::debug!("session seeded from durable storage");
        }
        Self { state: Arc::new(RwLock::new(SessionState { token, authenticated })), storage }
    }

    /// Store `token` in memory and durable storage. Requests issued after this
    /// call carry the new token.
    pub fn set_token(&self, token: &str) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).token = Some(token.to_owned());
        if let Err(error) = self.storage.set_item(TOKEN_KEY, token) {
            tracing::warn!(%error, "failed to persist session token");
        }
        tracing::info!("session token set");
    }

    /// Drop the token from memory and durable storage. Requests issued after
    /// this call carry no credential.
    pub fn remove_token(&self) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).token = None;
        if let Err(error) = self.storage.remove_item(TOKEN_KEY) {
            tracing::warn!(%error, "failed to remove persisted session token");
        }
        tracing::info!("session token removed");
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).authenticated = authenticated;
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// The in-memory authenticated flag only; see [`Self::is_authenticated_or_stored`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).authenticated
    }

    /// Token currently held by durable storage, bypassing the in-memory copy.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY)
    }

    /// Flag check with the durable-storage fallback used by the navigation guard.
    #[must_use]
    pub fn is_authenticated_or_stored(&self) -> bool {
        self.is_authenticated() || self.stored_token().is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
