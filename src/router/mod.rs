//! View navigation gated on the session

pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{GuardDecision, RouteGuard};
pub use navigator::{NavigationHandle, Navigator};
pub use routes::{RouteDef, RouteMatch, RouteTable};

use serde::Serialize;
use tokio::sync::mpsc;

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Arrived { path: String },
    Redirected { from: String, to: String },
    NotFound { path: String },
}

/// Single owner of the current location
///
/// `push` takes `&mut self`, so one guard decision completes before the
/// next navigation starts.
pub struct Router {
    table: RouteTable,
    guard: RouteGuard,
    current: Option<String>,
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
}

impl Router {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            table,
            guard,
            current: None,
            tx,
            rx,
        }
    }

    /// Handle for components that request navigation without owning the router
    pub fn navigator(&self) -> NavigationHandle {
        NavigationHandle::new(self.tx.clone())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub async fn push(&mut self, target: &str) -> NavigationOutcome {
        let Some(matched) = self.table.resolve(target) else {
            tracing::warn!(path = target, "No route matches");
            return NavigationOutcome::NotFound {
                path: target.to_string(),
            };
        };

        match self.guard.check(&matched.route).await {
            GuardDecision::Proceed => {
                tracing::debug!(
                    path = target,
                    route = %matched.route.name,
                    params = ?matched.params,
                    "Navigated"
                );
                self.current = Some(target.to_string());
                NavigationOutcome::Arrived {
                    path: target.to_string(),
                }
            }
            GuardDecision::Redirect(to) => {
                self.current = Some(to.clone());
                NavigationOutcome::Redirected {
                    from: target.to_string(),
                    to,
                }
            }
        }
    }

    /// Apply every navigation queued through [`Router::navigator`]
    pub async fn drain(&mut self) -> Vec<NavigationOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(target) = self.rx.try_recv() {
            outcomes.push(self.push(&target).await);
        }
        outcomes
    }
}
