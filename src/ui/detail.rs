//! Single-user detail view.

use std::time::Duration;

use crate::api::{User, UsersApi};
use crate::queries::{self, QueryData};
use crate::query::{QueryCache, QueryStatus};
use crate::ui::render::DETAIL_FAILED_MESSAGE;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: u64,
    pub user: Option<User>,
    pub status: QueryStatus,
    pub error: Option<String>,
}

/// Load a user through the cache and describe what to show.
///
/// A failed refetch keeps the previously cached record alongside the error.
pub async fn load_user_detail<A: UsersApi + ?Sized>(
    cache: &QueryCache<QueryData>,
    api: &A,
    id: u64,
    stale_time: Duration,
) -> DetailView {
    if let Err(e) = queries::load_user(cache, api, id, stale_time).await {
        tracing::warn!(id, error = %e, "User detail failed to load");
    }

    let entry = queries::user_key(id).ok().and_then(|key| cache.get(&key));
    let status = entry.as_ref().map_or(QueryStatus::Idle, |e| e.status);
    let user = entry
        .and_then(|e| e.data)
        .and_then(|data| data.user().cloned());

    DetailView {
        id,
        user,
        status,
        error: (status == QueryStatus::Error).then(|| DETAIL_FAILED_MESSAGE.to_string()),
    }
}
