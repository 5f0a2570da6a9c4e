use std::sync::Arc;

use axum::http::{Method, StatusCode};
use clap::CommandFactory;

use super::*;
use crate::services::auth::{LOGIN_PATH, LOGOUT_PATH};
use crate::services::users::DISCOVER_PATH;
use crate::session::storage::{DurableStorage, MemoryStorage, TOKEN_KEY};
use crate::test_support::{FakeBackend, memory_session};

fn app_for(backend: &FakeBackend, session: &SessionStore) -> App {
    let config = ClientConfig::new(&backend.base_url).unwrap();
    App::new(config, session.clone()).unwrap()
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn parses_swipe_with_flags() {
    let cli = Cli::try_parse_from(["astrodate", "--base-url", "http://api.test:8000/", "swipe", "42", "like"]).unwrap();
    assert_eq!(cli.command, Command::Swipe { user_id: 42, verdict: Verdict::Like });

    let config = cli.apply(ClientConfig::new("http://localhost:8000").unwrap()).unwrap();
    assert_eq!(config.base_url, "http://api.test:8000");
}

#[test]
fn users_defaults_paging() {
    let cli = Cli::try_parse_from(["astrodate", "users"]).unwrap();
    assert_eq!(cli.command, Command::Users { skip: 0, limit: DEFAULT_LIST_LIMIT });
}

#[test]
fn flags_fall_back_to_environment_variables() {
    let command = Cli::command();
    let env_of = |id: &str| {
        command
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_env())
            .map(|name| name.to_string_lossy().into_owned())
    };
    assert_eq!(env_of("base_url").as_deref(), Some("ASTRODATE_BASE_URL"));
    assert_eq!(env_of("state_file").as_deref(), Some("ASTRODATE_STATE_FILE"));
}

#[test]
fn invalid_base_url_flag_is_rejected() {
    let cli = Cli::try_parse_from(["astrodate", "--base-url", "ftp://nope", "status"]).unwrap();
    let err = cli.apply(ClientConfig::new("http://localhost:8000").unwrap()).unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::InvalidBaseUrl(_))));
}

// =============================================================================
// Session commands
// =============================================================================

#[tokio::test]
async fn login_stores_token_and_marks_authenticated() {
    let backend = FakeBackend::builder()
        .route(
            Method::POST,
            LOGIN_PATH,
            StatusCode::OK,
            serde_json::json!({ "access_token": "tok", "token_type": "bearer" }),
        )
        .spawn()
        .await;
    let (session, storage) = memory_session();
    let mut app = app_for(&backend, &session);

    let output = app
        .run(Command::Login { username: "ann@example.com".to_owned(), password: "pw".to_owned() })
        .await
        .unwrap();

    assert_eq!(output["route"], "/home");
    assert_eq!(session.token().as_deref(), Some("tok"));
    assert!(session.is_authenticated());
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(app.router().current(), RouteName::Home);
}

#[tokio::test]
async fn logout_clears_session_when_backend_fails() {
    let backend = FakeBackend::builder()
        .route(
            Method::POST,
            LOGOUT_PATH,
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "detail": "boom" }),
        )
        .spawn()
        .await;
    let (session, storage) = memory_session();
    session.set_token("tok");
    session.set_authenticated(true);
    let mut app = app_for(&backend, &session);

    let output = app.run(Command::Logout).await.unwrap();

    assert_eq!(output["logged_in"], false);
    assert_eq!(backend.last_request().authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(session.token(), None);
    assert_eq!(storage.get_item(TOKEN_KEY), None);
    assert!(!session.is_authenticated());
    assert!(!session.is_authenticated_or_stored());
    assert_eq!(app.router().current(), RouteName::Login);
}

#[tokio::test]
async fn status_reports_guard_outcome() {
    let backend = FakeBackend::builder().spawn().await;
    let (session, _) = memory_session();
    let mut app = app_for(&backend, &session);

    let output = app.run(Command::Status).await.unwrap();
    assert_eq!(output["has_token"], false);
    assert_eq!(output["home_route"], "Redirect(Login)");
    assert!(backend.requests().is_empty());
}

// =============================================================================
// Data commands
// =============================================================================

#[tokio::test]
async fn discover_without_session_sends_nothing() {
    let backend = FakeBackend::builder().spawn().await;
    let (session, _) = memory_session();
    let mut app = app_for(&backend, &session);

    let err = app.run(Command::Discover).await.unwrap_err();

    assert!(matches!(err, CliError::NotLoggedIn));
    assert!(backend.requests().is_empty());
    assert_eq!(app.router().current(), RouteName::Login);
    assert!(app.router().history().last().is_some_and(Navigation::was_redirected));
}

#[tokio::test]
async fn discover_with_stored_token_reaches_backend() {
    let backend = FakeBackend::builder()
        .route(
            Method::GET,
            DISCOVER_PATH,
            StatusCode::OK,
            serde_json::json!({ "id": 9, "email": "cat@example.com", "birth_date": "1990-01-01" }),
        )
        .spawn()
        .await;
    let session = SessionStore::new(Arc::new(MemoryStorage::with_token("stored")));
    let mut app = app_for(&backend, &session);

    let output = app.run(Command::Discover).await.unwrap();

    assert_eq!(output["id"], 9);
    assert_eq!(backend.last_request().authorization.as_deref(), Some("Bearer stored"));
    assert_eq!(app.router().current(), RouteName::Home);
}

#[tokio::test]
async fn backend_rejection_surfaces_as_api_error() {
    let backend = FakeBackend::builder()
        .route(
            Method::GET,
            DISCOVER_PATH,
            StatusCode::UNAUTHORIZED,
            serde_json::json!({ "detail": "Could not validate credentials" }),
        )
        .spawn()
        .await;
    let (session, _) = memory_session();
    session.set_token("expired");
    let mut app = app_for(&backend, &session);

    let err = app.run(Command::Discover).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ref api) if api.is_unauthorized()));
    assert_eq!(backend.requests().len(), 1);
}
