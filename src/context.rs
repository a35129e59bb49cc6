//! Application wiring: one session shared by the pipeline and the router

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{Clock, FileStorage, SessionStore, Storage, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::notice::Notifier;
use crate::router::{RouteGuard, RouteTable, Router};

pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,
    pub router: Router,
}

impl AppContext {
    /// Build everything on file-backed storage and the system clock
    pub async fn bootstrap(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(&config.session.storage_path));
        Self::with_parts(config, storage, Arc::new(SystemClock), notifier).await
    }

    /// Build with explicit collaborators; the session is hydrated before returning
    pub async fn with_parts(
        config: Config,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session = SessionStore::open(storage, clock).await;
        let guard = RouteGuard::new(session.clone(), config.router.login_path.clone());
        let router = Router::new(RouteTable::standard(&config.router.login_path), guard);
        let api = ApiClient::new(&config, session.clone(), Arc::new(router.navigator()), notifier)?;

        tracing::debug!(base_url = api.base_url(), "Client ready");

        Ok(Self {
            config,
            session,
            api,
            router,
        })
    }
}
