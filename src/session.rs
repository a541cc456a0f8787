//! Per-process dashboard session.
//!
//! Owns the query cache and the persisted stores for as long as the
//! dashboard runs. Nothing here is global; views get handles from the
//! session and the cache is torn down in [`Session::shutdown`].

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiError, HttpUsersClient, UsersApi};
use crate::config::Config;
use crate::queries::QueryData;
use crate::query::QueryCache;
use crate::store::{ActivityLog, AuthStore, PersistentStore, StoreError, ThemeStore};
use crate::ui::{load_user_detail, DetailView, UserTable};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to build API client: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to open client state: {0}")]
    Store(#[from] StoreError),
}

pub struct Session<A: ?Sized> {
    config: Config,
    api: Arc<A>,
    cache: QueryCache<QueryData>,
    activity: ActivityLog,
    theme: ThemeStore,
    auth: AuthStore,
}

impl Session<HttpUsersClient> {
    /// Start a session against the configured HTTP API with on-disk stores.
    pub fn start(config: Config) -> Result<Self, SessionError> {
        let api = Arc::new(HttpUsersClient::new(&config.api)?);
        let store = PersistentStore::new(config.storage.resolve_dir());
        Self::with_api(config, api, Some(store))
    }
}

impl<A: UsersApi + ?Sized> Session<A> {
    /// Start a session on any API. `None` keeps client state in memory.
    pub fn with_api(
        config: Config,
        api: Arc<A>,
        store: Option<PersistentStore>,
    ) -> Result<Self, SessionError> {
        let (activity, theme, auth) = match store {
            Some(store) => {
                tracing::debug!(dir = %store.dir().display(), "Opening client state");
                (
                    ActivityLog::load(store.clone())?,
                    ThemeStore::load(store.clone())?,
                    AuthStore::load(store)?,
                )
            }
            None => (
                ActivityLog::in_memory(),
                ThemeStore::in_memory(),
                AuthStore::in_memory(),
            ),
        };

        tracing::info!(base_url = %config.api.base_url, "Session started");
        Ok(Self {
            config,
            api,
            cache: QueryCache::new(),
            activity,
            theme,
            auth,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache<QueryData> {
        &self.cache
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// A user table bound to this session's cache and activity log.
    pub fn user_table(&self) -> UserTable<A> {
        UserTable::new(
            Arc::clone(&self.api),
            self.cache.clone(),
            self.activity.clone(),
            self.config.table.clone(),
        )
    }

    pub async fn user_detail(&self, id: u64) -> DetailView {
        load_user_detail(&self.cache, &*self.api, id, self.config.table.stale_time()).await
    }

    /// End the session. Drops every cache entry and subscriber.
    pub fn shutdown(self) {
        self.cache.clear();
        tracing::info!("Session ended");
    }
}
