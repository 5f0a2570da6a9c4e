//! In-process fake backend for HTTP-level tests.
//!
//! Serves canned responses keyed by method + path from an axum app bound to
//! `127.0.0.1:0` and records every request it receives.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::config::Timeouts;
use crate::net::api::ApiClient;
use crate::session::SessionStore;
use crate::session::storage::MemoryStorage;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Debug)]
struct CannedRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

#[derive(Default)]
struct FakeState {
    routes: Vec<CannedRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeBackend {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeBackend {
    pub fn builder() -> FakeBackendBuilder {
        FakeBackendBuilder::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().last().cloned().expect("no request recorded")
    }

    /// Client with the bearer interceptor wired to `session`.
    pub fn client(&self, session: &SessionStore) -> ApiClient {
        ApiClient::new(&self.base_url, Timeouts::default())
            .unwrap()
            .with_interceptor(crate::net::api::BearerAuth::new(session.clone()))
    }
}

#[derive(Default)]
pub struct FakeBackendBuilder {
    routes: Vec<CannedRoute>,
}

impl FakeBackendBuilder {
    pub fn route(mut self, method: Method, path: &str, status: StatusCode, body: serde_json::Value) -> Self {
        self.routes.push(CannedRoute { method, path: path.to_owned(), status, body: body.to_string() });
        self
    }

    pub fn route_raw(mut self, method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        self.routes.push(CannedRoute { method, path: path.to_owned(), status, body: body.to_owned() });
        self
    }

    pub async fn spawn(self) -> FakeBackend {
        let state = Arc::new(FakeState { routes: self.routes, requests: Mutex::new(Vec::new()) });
        let app = axum::Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        FakeBackend { base_url: format!("http://{addr}"), state }
    }
}

async fn handle(State(state): State<Arc<FakeState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header_value = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    let route = state
        .routes
        .iter()
        .find(|r| r.method == parts.method && r.path == parts.uri.path());
    match route {
        Some(route) => Response::builder()
            .status(route.status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(route.body.clone()))
            .unwrap(),
        None => (StatusCode::NOT_FOUND, "{\"detail\":\"Not Found\"}").into_response(),
    }
}

/// Fresh session over in-memory storage, plus the storage handle for assertions.
pub fn memory_session() -> (SessionStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (SessionStore::new(storage.clone()), storage)
}
