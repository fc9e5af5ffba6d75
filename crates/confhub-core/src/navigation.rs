//! Views of the console and the rules for reaching them.

use std::fmt;

use crate::config::{Environment, RecordId};
use crate::session::AuthState;

/// A view the operator can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Services,
    Versions {
        service_name: String,
        environment: Environment,
    },
    ConfigView {
        id: RecordId,
    },
    Upload,
}

impl Route {
    /// Resolves a path. The root and every unknown path resolve to the dashboard.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["services"] => Self::Services,
            ["upload"] => Self::Upload,
            ["services", service, env, "versions"] => match env.parse::<Environment>() {
                Ok(environment) => Self::Versions {
                    service_name: (*service).to_string(),
                    environment,
                },
                Err(_) => Self::Dashboard,
            },
            ["configs", "view", id] => Self::ConfigView {
                id: RecordId::from(*id),
            },
            _ => Self::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Services => "/services".to_string(),
            Self::Versions {
                service_name,
                environment,
            } => format!("/services/{service_name}/{environment}/versions"),
            Self::ConfigView { id } => format!("/configs/view/{id}"),
            Self::Upload => "/upload".to_string(),
        }
    }

    /// Protected views render only for an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What to do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Render(Route),
    /// Render nothing and go to the login view instead.
    RedirectToLogin,
    /// Stored credentials have not been restored yet; render nothing.
    Pending,
}

/// Decides whether `route` may render in the given state.
pub fn guard(route: Route, state: &AuthState) -> RouteDecision {
    if !route.is_protected() {
        return RouteDecision::Render(route);
    }
    match state {
        AuthState::Unknown => RouteDecision::Pending,
        AuthState::Unauthenticated => RouteDecision::RedirectToLogin,
        AuthState::Authenticated(_) => RouteDecision::Render(route),
    }
}

/// Moves the operator to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
