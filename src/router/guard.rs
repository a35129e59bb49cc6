//! Navigation guard

use crate::auth::SessionStore;
use crate::router::routes::RouteDef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Keeps anonymous users out of views that require a session
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
    login_path: String,
}

impl RouteGuard {
    pub fn new(session: SessionStore, login_path: impl Into<String>) -> Self {
        Self {
            session,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide a navigation to `route`
    ///
    /// Waits for session hydration first, so a persisted session is never
    /// mistaken for an anonymous one.
    pub async fn check(&self, route: &RouteDef) -> GuardDecision {
        self.session.hydrated().await;

        if route.requires_auth && !self.session.is_authenticated().await {
            tracing::info!(route = %route.name, "Not authenticated, redirecting to login");
            return GuardDecision::Redirect(self.login_path.clone());
        }
        GuardDecision::Proceed
    }
}
