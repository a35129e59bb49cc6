//! Navigation requests issued outside the router

use tokio::sync::mpsc;

/// Fire-and-forget request to move to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Cloneable handle queueing requests for a [`Router`](super::Router)
#[derive(Debug, Clone)]
pub struct NavigationHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl NavigationHandle {
    pub(super) fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Navigator for NavigationHandle {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigation requested");
        if self.tx.send(path.to_string()).is_err() {
            tracing::warn!(path, "Router is gone, dropping navigation request");
        }
    }
}
