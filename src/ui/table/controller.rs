//! Binds the user table state to the query cache and the mutation
//! coordinator.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{User, UsersApi};
use crate::config::TableConfig;
use crate::mutation::{MutationCoordinator, MutationError, MutationState, MutationTracker};
use crate::queries::{self, LoadError, QueryData, UsersKeyParams};
use crate::query::{CacheError, CacheEventKind, QueryCache, QueryKey, QueryStatus, Subscription};
use crate::store::ActivityLog;
use crate::ui::form::{SubmitError, UserForm};
use crate::ui::mvi::Reducer;
use crate::ui::render::{empty_message, LOAD_FAILED_MESSAGE};
use crate::ui::table::intent::TableIntent;
use crate::ui::table::reducer::TableReducer;
use crate::ui::table::state::TableState;

/// What the table shows right now.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersView {
    pub page: u32,
    /// Rows after the client-side company filter.
    pub users: Vec<User>,
    pub status: QueryStatus,
    /// Load-failure banner. Cached rows may still be shown beside it.
    pub error: Option<String>,
    pub has_more: bool,
    pub empty_message: Option<String>,
}

pub struct UserTable<A: ?Sized> {
    api: Arc<A>,
    cache: QueryCache<QueryData>,
    coordinator: MutationCoordinator<A>,
    config: TableConfig,
    state: TableState,
    events: Subscription,
    create: MutationTracker,
    update: MutationTracker,
    delete: MutationTracker,
}

impl<A: UsersApi + ?Sized> UserTable<A> {
    pub fn new(
        api: Arc<A>,
        cache: QueryCache<QueryData>,
        activity: ActivityLog,
        config: TableConfig,
    ) -> Self {
        let page_size = config.page_size as usize;
        let coordinator =
            MutationCoordinator::new(Arc::clone(&api), cache.clone(), activity, page_size);
        let events = cache.subscribe(queries::users_prefix().ok());
        Self {
            api,
            cache,
            coordinator,
            config,
            state: TableState::default(),
            events,
            create: MutationTracker::new(),
            update: MutationTracker::new(),
            delete: MutationTracker::new(),
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn dispatch(&mut self, intent: TableIntent) {
        let state = mem::take(&mut self.state);
        self.state = TableReducer::reduce(state, intent);
    }

    pub fn key_params(&self) -> UsersKeyParams {
        UsersKeyParams {
            page: self.state.page,
            search: self.state.search.clone(),
            sort_order: Some(self.state.sort_order),
        }
    }

    pub fn users_key(&self) -> Result<QueryKey, CacheError> {
        queries::users_key(&self.key_params())
    }

    /// Load the current page, reusing a fresh cached copy.
    pub async fn load(&mut self) -> UsersView {
        self.load_page(false).await
    }

    /// Refetch the current page regardless of freshness.
    pub async fn refresh(&mut self) -> UsersView {
        self.load_page(true).await
    }

    async fn load_page(&mut self, force: bool) -> UsersView {
        let key = match self.users_key() {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(error = %e, "Could not build users key");
                return self.view();
            }
        };
        let params = self.key_params().list_params(self.config.page_size);
        let stale_time = if force {
            Duration::ZERO
        } else {
            self.config.stale_time()
        };

        let result =
            queries::load_users_page(&self.cache, &*self.api, &key, &params, stale_time).await;
        match result {
            Ok(users) => self.dispatch(TableIntent::PageLoaded {
                rows: users.len(),
                page_size: self.config.page_size as usize,
            }),
            Err(e) => tracing::warn!(key = %key, error = %e, "Users page failed to load"),
        }
        self.view()
    }

    /// Render state from the cache without any I/O.
    pub fn view(&self) -> UsersView {
        let entry = self.users_key().ok().and_then(|key| self.cache.get(&key));
        let status = entry.as_ref().map_or(QueryStatus::Idle, |e| e.status);
        let page_rows: Vec<User> = entry
            .as_ref()
            .and_then(|e| e.data.as_ref())
            .and_then(QueryData::users)
            .map(<[User]>::to_vec)
            .unwrap_or_default();
        let has_more = page_rows.len() >= self.config.page_size as usize;

        let users: Vec<User> = page_rows
            .into_iter()
            .filter(|user| self.state.company_filter.accepts(user))
            .collect();

        let settled = matches!(status, QueryStatus::Success | QueryStatus::Error);
        let empty = (settled && users.is_empty()).then(|| empty_message(&self.state.search));
        let error = (status == QueryStatus::Error).then(|| LOAD_FAILED_MESSAGE.to_string());

        UsersView {
            page: self.state.page,
            users,
            status,
            error,
            has_more,
            empty_message: empty,
        }
    }

    /// Refetch the current page if a cache event invalidated it.
    ///
    /// Returns whether a refetch happened.
    pub async fn sync(&mut self) -> bool {
        let Ok(current) = self.users_key() else {
            return false;
        };
        let invalidated = self
            .events
            .drain()
            .into_iter()
            .any(|event| event.kind == CacheEventKind::Invalidated && event.key == current);
        if invalidated {
            tracing::debug!(key = %current, "Refetching invalidated page");
            self.refresh().await;
        }
        invalidated
    }

    pub async fn companies(&self) -> Result<Vec<String>, LoadError> {
        queries::load_companies(&self.cache, &*self.api, self.config.companies_stale_time()).await
    }

    /// Validate and create. The new row appears on the current page at once.
    pub async fn submit_create(&mut self, form: &UserForm) -> Result<User, SubmitError> {
        let draft = form.validate()?;
        self.dispatch(TableIntent::CloseDialog);
        let targets = [self.users_key().map_err(MutationError::from)?];
        let user = self
            .create
            .track(self.coordinator.create_user(draft, &targets))
            .await?;
        Ok(user)
    }

    /// Validate and update. Patches the current page and any cached detail.
    pub async fn submit_update(&mut self, id: u64, form: &UserForm) -> Result<(), SubmitError> {
        let draft = form.validate()?;
        self.dispatch(TableIntent::CloseDialog);
        let targets = [
            self.users_key().map_err(MutationError::from)?,
            queries::user_key(id).map_err(MutationError::from)?,
        ];
        self.update
            .track(self.coordinator.update_user(id, draft, &targets))
            .await?;
        Ok(())
    }

    pub async fn delete(&mut self, id: u64) -> Result<(), MutationError> {
        self.dispatch(TableIntent::CloseDialog);
        let targets = [self.users_key()?];
        self.delete
            .track(self.coordinator.delete_user(id, &targets))
            .await
    }

    pub fn create_state(&self) -> MutationState {
        self.create.state()
    }

    pub fn update_state(&self) -> MutationState {
        self.update.state()
    }

    pub fn delete_state(&self) -> MutationState {
        self.delete.state()
    }

    /// Trackers for watching mutations from another task.
    pub fn trackers(&self) -> (MutationTracker, MutationTracker, MutationTracker) {
        (self.create.clone(), self.update.clone(), self.delete.clone())
    }
}
