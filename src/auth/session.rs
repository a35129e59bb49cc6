//! Session management

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::models::{Role, UserProfile};
use crate::auth::storage::{MemoryStorage, Storage};
use crate::error::Error;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// Storage key holding the persisted session record
pub const SESSION_KEY: &str = "campus.session";

/// The process-wide authentication record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Opaque credential; empty means no session
    pub token: String,
    /// Credential scheme, e.g. `bearer`
    pub token_type: String,
    /// Expiry in epoch milliseconds; 0 when there is no session
    pub expires_at: i64,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Whether the credential is present and unexpired at `now_millis`
    pub fn is_authenticated_at(&self, now_millis: i64) -> bool {
        !self.token.is_empty() && now_millis < self.expires_at
    }

    /// Nothing worth persisting
    pub fn is_empty(&self) -> bool {
        self.token.is_empty() && self.user.is_none()
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.expires_at == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.expires_at).single()
    }
}

/// Owner of the session record, shared by the request pipeline and the route guard
///
/// Clones share the same record. Every mutation is a single critical section
/// under the write lock, so readers observe either the previous record or the
/// new one. Expiry is only observed at query time; nothing fires when a token
/// lapses.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    hydrated: Arc<watch::Sender<bool>>,
}

impl SessionStore {
    /// Create an empty, not yet hydrated store
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        let (hydrated, _) = watch::channel(false);
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            storage,
            clock,
            hydrated: Arc::new(hydrated),
        }
    }

    /// Create a store and hydrate it from `storage`
    pub async fn open(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        let store = Self::new(storage, clock);
        store.hydrate().await;
        store
    }

    /// In-memory store on the system clock, already hydrated
    pub async fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()), Arc::new(SystemClock)).await
    }

    /// Restore the persisted record, once
    ///
    /// A record that was mutated before hydration is kept as is. Unreadable
    /// persisted state is logged and discarded.
    pub async fn hydrate(&self) {
        if self.is_hydrated() {
            return;
        }

        let storage = Arc::clone(&self.storage);
        let read = tokio::task::spawn_blocking(move || storage.get(SESSION_KEY))
            .await
            .unwrap_or_else(|e| Err(Error::Other(format!("storage read task failed: {}", e))));

        let restored = match read {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding unreadable persisted session: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                None
            }
        };

        if let Some(restored) = restored {
            let mut session = self.session.write().await;
            if *session == Session::default() {
                tracing::debug!(
                    has_token = !restored.token.is_empty(),
                    has_user = restored.user.is_some(),
                    "Hydrated session from storage"
                );
                *session = restored;
            } else {
                tracing::debug!("Session mutated before hydration, keeping in-memory state");
            }
        }

        self.hydrated.send_replace(true);
    }

    pub fn is_hydrated(&self) -> bool {
        *self.hydrated.borrow()
    }

    /// Wait until hydration has completed
    pub async fn hydrated(&self) {
        let mut rx = self.hydrated.subscribe();
        // The sender lives as long as `self`, so this only returns once ready
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Replace the credential; expiry is `now + expires_in_secs`
    pub async fn set_session(
        &self,
        token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in_secs: u64,
    ) {
        let lifetime_ms = i64::try_from(expires_in_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        let expires_at = self.clock.now_millis().saturating_add(lifetime_ms);

        let mut session = self.session.write().await;
        session.token = token.into();
        session.token_type = token_type.into();
        session.expires_at = expires_at;
        tracing::info!(expires_at, "Session established");
        self.persist(&session).await;
    }

    /// Attach or replace the user profile
    pub async fn set_user(&self, profile: UserProfile) {
        let mut session = self.session.write().await;
        tracing::debug!(user_id = profile.id, "Session user updated");
        session.user = Some(profile);
        self.persist(&session).await;
    }

    /// Drop the credential, keeping any profile; idempotent
    pub async fn clear_session(&self) {
        let mut session = self.session.write().await;
        if !session.token.is_empty() || session.expires_at != 0 {
            tracing::info!("Session cleared");
        }
        session.token.clear();
        session.expires_at = 0;
        self.persist(&session).await;
    }

    pub async fn clear_user(&self) {
        let mut session = self.session.write().await;
        session.user = None;
        self.persist(&session).await;
    }

    pub async fn is_authenticated(&self) -> bool {
        let now = self.clock.now_millis();
        self.session.read().await.is_authenticated_at(now)
    }

    /// True iff a profile is present and carries `role`
    pub async fn role_is(&self, role: Role) -> bool {
        self.session
            .read()
            .await
            .user
            .as_ref()
            .is_some_and(|user| user.has_role(role))
    }

    /// Authorization header value, present only while authenticated
    pub async fn authorization(&self) -> Option<String> {
        let now = self.clock.now_millis();
        let session = self.session.read().await;
        session
            .is_authenticated_at(now)
            .then(|| format!("{} {}", session.token_type, session.token))
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.session.read().await.user.clone()
    }

    /// Copy of the current record
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Write the whole record on the blocking pool
    ///
    /// Callers hold the write guard across this, so writes land in mutation order.
    /// Failures are logged, never returned.
    async fn persist(&self, session: &Session) {
        let storage = Arc::clone(&self.storage);
        let record = (!session.is_empty()).then(|| serde_json::to_string(session));

        let written = tokio::task::spawn_blocking(move || match record {
            None => storage.remove(SESSION_KEY),
            Some(raw) => raw
                .map_err(Error::from)
                .and_then(|raw| storage.set(SESSION_KEY, &raw)),
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to persist session: {}", e),
            Err(e) => tracing::warn!("Session persistence task failed: {}", e),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("hydrated", &self.is_hydrated())
            .finish_non_exhaustive()
    }
}
