//! Command surface of the `astrodate` binary.
//!
//! `main.rs` parses [`Cli`], sets up tracing and opens the session file; the
//! [`App`] here runs one [`Command`] and hands back the JSON to print.
//! Data commands navigate to `/home` first, so the auth guard decides
//! whether any request goes out.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::UserCreate;
use crate::router::{Navigation, NavigationError, RouteName, Router};
use crate::services::auth::{RegistrationError, validate_registration_now};
use crate::services::users::DEFAULT_LIST_LIMIT;
use crate::services::{AuthService, UserService};
use crate::session::SessionStore;
use crate::session::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),
    #[error("invalid registration: {0}")]
    Registration(#[from] RegistrationError),
    #[error("not logged in; run `astrodate login <username> <password>` first")]
    NotLoggedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "astrodate", about = "AstroDate dating client")]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, env = "ASTRODATE_BASE_URL")]
    pub base_url: Option<String>,

    /// Session state file.
    #[arg(long, env = "ASTRODATE_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply the flag values on top of `config`.
    pub fn apply(&self, mut config: ClientConfig) -> Result<ClientConfig, CliError> {
        if let Some(base_url) = self.base_url.as_deref() {
            config = config.with_base_url(base_url)?;
        }
        if let Some(state_file) = &self.state_file {
            config = config.with_state_file(state_file.clone());
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and store the session token.
    Login { username: String, password: String },
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
    },
    /// Drop the stored session token.
    Logout,
    /// Show the stored session and where `/home` would lead.
    Status,
    /// Fetch one compatible candidate.
    Discover,
    /// Like or dislike a user.
    Swipe { user_id: i64, verdict: Verdict },
    /// Like a user without reading a match outcome.
    Like { user_id: i64 },
    /// Users who liked me.
    Likes,
    /// Users I liked.
    MyLikes,
    /// Page through all users.
    Users {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Verdict {
    Like,
    Dislike,
}

impl Verdict {
    #[must_use]
    pub fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    base_url: &'a str,
    state_file: String,
    has_token: bool,
    home_route: String,
}

#[derive(Debug)]
pub struct App {
    config: ClientConfig,
    session: SessionStore,
    router: Router,
    auth: AuthService,
    users: UserService,
}

impl App {
    /// Wire services and router to `session`, talking to `config.base_url`.
    pub fn new(config: ClientConfig, session: SessionStore) -> Result<Self, CliError> {
        let api = ApiClient::with_session(&config, session.clone())?;
        Ok(Self {
            config,
            router: Router::new(session.clone()),
            session,
            auth: AuthService::new(api.clone()),
            users: UserService::new(api),
        })
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Run one command and return the JSON to print.
    pub async fn run(&mut self, command: Command) -> Result<Value, CliError> {
        match command {
            Command::Login { username, password } => self.login(&username, &password).await,
            Command::Register { email, password, birth_date } => {
                let payload = UserCreate { email, password, birth_date };
                validate_registration_now(&payload)?;
                let user = self.auth.register(&payload).await?;
                Ok(serde_json::to_value(user)?)
            }
            Command::Logout => Ok(self.logout().await),
            Command::Status => self.status(),
            Command::Discover => {
                self.enter_home()?;
                Ok(serde_json::to_value(self.users.discover_compatible_user().await?)?)
            }
            Command::Swipe { user_id, verdict } => {
                self.enter_home()?;
                Ok(serde_json::to_value(self.users.swipe_user(user_id, verdict.is_like()).await?)?)
            }
            Command::Like { user_id } => {
                self.enter_home()?;
                self.users.like_user(user_id).await?;
                Ok(serde_json::json!({ "liked": user_id }))
            }
            Command::Likes => {
                self.enter_home()?;
                Ok(serde_json::to_value(self.users.get_users_who_liked_me().await?)?)
            }
            Command::MyLikes => {
                self.enter_home()?;
                Ok(serde_json::to_value(self.users.get_my_likes().await?)?)
            }
            Command::Users { skip, limit } => {
                self.enter_home()?;
                Ok(serde_json::to_value(self.users.list_users(skip, limit).await?)?)
            }
        }
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<Value, CliError> {
        let token = self.auth.login(username, password).await?;
        self.session.set_token(&token.access_token);
        self.session.set_authenticated(true);
        let navigation = self.router.push_route(RouteName::Home);
        tracing::info!(route = %navigation.destination(), "logged in");
        Ok(serde_json::json!({
            "logged_in": true,
            "token_type": token.token_type,
            "route": navigation.destination().path(),
        }))
    }

    async fn logout(&mut self) -> Value {
        if let Err(error) = self.auth.logout().await {
            tracing::warn!(%error, "backend logout failed; clearing local session anyway");
        }
        self.session.remove_token();
        self.session.set_authenticated(false);
        let navigation = self.router.push_route(RouteName::Login);
        serde_json::json!({
            "logged_in": false,
            "route": navigation.destination().path(),
        })
    }

    fn status(&self) -> Result<Value, CliError> {
        let home = self.router.check(RouteName::Home.path())?;
        let report = StatusReport {
            base_url: &self.config.base_url,
            state_file: self.config.state_file.display().to_string(),
            has_token: self.session.stored_token().is_some(),
            home_route: format!("{home:?}"),
        };
        Ok(serde_json::to_value(report)?)
    }

    /// Data commands live on the home view; a redirect means no session.
    fn enter_home(&mut self) -> Result<(), CliError> {
        match self.router.push(RouteName::Home.path())? {
            Navigation::Arrived(_) => Ok(()),
            Navigation::Redirected { .. } => Err(CliError::NotLoggedIn),
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
