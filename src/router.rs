//! Route table and navigation guard.
//!
//! DESIGN
//! ======
//! Two routes: `/` (login, public) and `/home` (requires auth). Before every
//! navigation the guard asks the session store whether the user is logged
//! in, using the in-memory flag and falling back to the durable token so a
//! store that has not caught up yet does not bounce a logged-in user.
//!
//! A blocked navigation is a redirect to the login route, never an error.
//! Only unknown paths fail.

use crate::session::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    Home,
}

impl RouteName {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Home => "/home",
        }
    }

    #[must_use]
    pub fn route(self) -> &'static Route {
        match self {
            Self::Login => &ROUTES[0],
            Self::Home => &ROUTES[1],
        }
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Login => "Login",
            Self::Home => "Home",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: RouteName,
    pub meta: RouteMeta,
}

pub static ROUTES: [Route; 2] = [
    Route { path: "/", name: RouteName::Login, meta: RouteMeta { requires_auth: false } },
    Route { path: "/home", name: RouteName::Home, meta: RouteMeta { requires_auth: true } },
];

/// Route every blocked navigation is sent to.
pub const LOGIN_ROUTE: RouteName = RouteName::Login;

/// Navigations kept in `Router::history`; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(RouteName),
}

/// Pure guard rule: protected target + unauthenticated session -> login.
#[must_use]
pub fn guard(target: &Route, authenticated: bool) -> GuardDecision {
    if target.meta.requires_auth && !authenticated {
        GuardDecision::Redirect(LOGIN_ROUTE)
    } else {
        GuardDecision::Proceed
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Arrived(RouteName),
    Redirected { requested: RouteName, to: RouteName },
}

impl Navigation {
    /// Route the router ended up on.
    #[must_use]
    pub fn destination(&self) -> RouteName {
        match self {
            Self::Arrived(name) | Self::Redirected { to: name, .. } => *name,
        }
    }

    #[must_use]
    pub fn was_redirected(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no route matches {0:?}")]
    NotFound(String),
}

/// Navigation state: current route plus the most recent navigations.
#[derive(Debug, Clone)]
pub struct Router {
    session: SessionStore,
    current: RouteName,
    history: Vec<Navigation>,
}

impl Router {
    /// Router on the login route, guarding with `session`.
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session, current: LOGIN_ROUTE, history: Vec::new() }
    }

    #[must_use]
    pub fn current(&self) -> RouteName {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[Navigation] {
        &self.history
    }

    /// Look up the route for `path`. A trailing slash is ignored.
    #[must_use]
    pub fn resolve(path: &str) -> Option<&'static Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        ROUTES.iter().find(|route| route.path == normalized)
    }

    /// Evaluate the guard for `path` against the session without moving.
    pub fn check(&self, path: &str) -> Result<GuardDecision, NavigationError> {
        let target = Self::resolve(path).ok_or_else(|| NavigationError::NotFound(path.to_owned()))?;
        Ok(guard(target, self.session.is_authenticated_or_stored()))
    }

    /// Navigate to `path`, running the guard first.
    pub fn push(&mut self, path: &str) -> Result<Navigation, NavigationError> {
        let target = Self::resolve(path).ok_or_else(|| NavigationError::NotFound(path.to_owned()))?;
        Ok(self.navigate(target))
    }

    /// Navigate to a named route.
    pub fn push_route(&mut self, name: RouteName) -> Navigation {
        self.navigate(name.route())
    }

    fn navigate(&mut self, target: &Route) -> Navigation {
        let navigation = match guard(target, self.session.is_authenticated_or_stored()) {
            GuardDecision::Proceed => Navigation::Arrived(target.name),
            GuardDecision::Redirect(to) => {
                tracing::debug!(requested = %target.name, redirect = %to, "navigation blocked by auth guard");
                Navigation::Redirected { requested: target.name, to }
            }
        };
        self.current = navigation.destination();
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(navigation.clone());
        navigation
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
