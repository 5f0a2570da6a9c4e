//! Configured HTTP channel to the AstroDate backend.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` wraps one `reqwest::Client` with a fixed base address and a
//! JSON `Content-Type` default. Every request is built, passed through the
//! registered `RequestInterceptor`s in order, then executed. `BearerAuth`
//! is the interceptor that attaches the session token.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors and non-2xx responses come back as `ApiError` without
//! retry or translation; callers decide what to show.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Timeouts, normalize_base_url};
use crate::error::ApiError;
use crate::session::SessionStore;

// =============================================================================
// INTERCEPTORS
// =============================================================================

/// Hook run on every built request right before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut Request);
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut Request) + Send + Sync,
{
    fn intercept(&self, request: &mut Request) {
        self(request);
    }
}

/// Attaches `Authorization: Bearer <token>` from the session store, or strips
/// the header when no token is held.
#[derive(Clone, Debug)]
pub struct BearerAuth {
    session: SessionStore,
}

impl BearerAuth {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: &mut Request) {
        let Some(token) = self.session.token() else {
            request.headers_mut().remove(AUTHORIZATION);
            return;
        };
        match HeaderValue::from_str(&bearer_value(&token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(error) => {
                tracing::warn!(%error, "session token is not a valid header value; sending without credentials");
                request.headers_mut().remove(AUTHORIZATION);
            }
        }
    }
}

pub(crate) fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client for `base_url` with no interceptors.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(ApiError::ClientBuild)?;

        Ok(Self { http, base_url, interceptors: Vec::new() })
    }

    /// Client for `config` carrying the session's bearer token on every request.
    pub fn with_session(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        Ok(Self::new(&config.base_url, config.timeouts)?.with_interceptor(BearerAuth::new(session)))
    }

    #[must_use]
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path (`/users/discover`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Build `request` and run the interceptors over it.
    pub fn prepare(&self, request: RequestBuilder) -> Result<Request, ApiError> {
        let mut request = request.build()?;
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut request);
        }
        Ok(request)
    }

    /// Send `request`, failing on transport errors and non-2xx statuses.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.prepare(request)?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    tracing::debug!(%error, %url, "failed to read error response body");
                    String::new()
                }
            };
            tracing::debug!(%method, %url, status = status.as_u16(), "backend rejected request");
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    /// Send `request` and decode the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send `request` and ignore whatever body comes back.
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
