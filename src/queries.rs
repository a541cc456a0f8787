//! Dashboard queries: the cached payload type, key builders, and the read
//! path that fills the cache from the users API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{filter_by_search, unique_companies, ApiError, ListParams, SortOrder, User, UsersApi};
use crate::query::{CacheError, KeyPrefix, QueryCache, QueryKey};

pub const USERS_OP: &str = "users";
pub const USER_OP: &str = "user";
pub const COMPANIES_OP: &str = "companies";

/// Everything the dashboard caches.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    /// One page of the users list.
    Users(Vec<User>),
    /// A single user's detail record.
    User(User),
    /// Company names for the filter dropdown.
    Companies(Vec<String>),
}

impl QueryData {
    pub fn users(&self) -> Option<&[User]> {
        match self {
            Self::Users(users) => Some(users),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn companies(&self) -> Option<&[String]> {
        match self {
            Self::Companies(names) => Some(names),
            _ => None,
        }
    }
}

/// Parameters identifying one cached users page.
///
/// The company filter is applied client-side and is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersKeyParams {
    pub page: u32,
    pub search: String,
    pub sort_order: Option<SortOrder>,
}

impl UsersKeyParams {
    pub fn list_params(&self, limit: u32) -> ListParams {
        ListParams {
            page: self.page,
            limit,
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            sort_email: self.sort_order,
            company: None,
        }
    }
}

pub fn users_key(params: &UsersKeyParams) -> Result<QueryKey, CacheError> {
    QueryKey::new(USERS_OP, params)
}

pub fn user_key(id: u64) -> Result<QueryKey, CacheError> {
    QueryKey::new(USER_OP, &serde_json::json!({ "id": id }))
}

pub fn companies_key() -> Result<QueryKey, CacheError> {
    QueryKey::bare(COMPANIES_OP)
}

pub fn users_prefix() -> Result<KeyPrefix, CacheError> {
    KeyPrefix::operation(USERS_OP)
}

/// Load a users page through the cache.
///
/// The search filter is re-applied locally so the page only holds names
/// containing the search text even if the server ignores `q`.
pub async fn load_users_page<A: UsersApi + ?Sized>(
    cache: &QueryCache<QueryData>,
    api: &A,
    key: &QueryKey,
    params: &ListParams,
    stale_time: Duration,
) -> Result<Vec<User>, ApiError> {
    let data = cache
        .ensure(key, stale_time, move || async move {
            let users = api.list_users(params).await?;
            Ok::<_, ApiError>(QueryData::Users(filter_by_search(
                users,
                params.search.as_deref(),
            )))
        })
        .await?;
    Ok(data.users().map(<[User]>::to_vec).unwrap_or_default())
}

/// Force a refetch of a users page, bypassing freshness.
pub async fn refetch_users_page<A: UsersApi + ?Sized>(
    cache: &QueryCache<QueryData>,
    api: &A,
    key: &QueryKey,
    params: &ListParams,
) -> Result<Vec<User>, ApiError> {
    load_users_page(cache, api, key, params, Duration::ZERO).await
}

pub async fn load_user<A: UsersApi + ?Sized>(
    cache: &QueryCache<QueryData>,
    api: &A,
    id: u64,
    stale_time: Duration,
) -> Result<Option<User>, LoadError> {
    let key = user_key(id)?;
    let data = cache
        .ensure(&key, stale_time, move || async move {
            api.get_user(id).await.map(QueryData::User)
        })
        .await?;
    Ok(data.user().cloned())
}

pub async fn load_companies<A: UsersApi + ?Sized>(
    cache: &QueryCache<QueryData>,
    api: &A,
    stale_time: Duration,
) -> Result<Vec<String>, LoadError> {
    let key = companies_key()?;
    let data = cache
        .ensure(&key, stale_time, move || async move {
            let users = api.list_all_users().await?;
            Ok::<_, ApiError>(QueryData::Companies(unique_companies(&users)))
        })
        .await?;
    Ok(data.companies().map(<[String]>::to_vec).unwrap_or_default())
}

/// Read-path failure: either the key was unusable or the request failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
