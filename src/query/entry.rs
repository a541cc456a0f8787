use std::time::{Duration, Instant};

use crate::query::key::QueryKey;

/// Lifecycle of a cached query.
///
/// `idle -> loading -> {success, error}`; any state may return to `loading`.
/// Data stays visible while loading and after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Snapshot of one cache slot. Owned by the cache; callers get clones.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEntry<D> {
    pub key: QueryKey,
    pub data: Option<D>,
    pub status: QueryStatus,
    /// Message of the last failed fetch, cleared on success.
    pub error: Option<String>,
    /// When `data` was last written.
    pub last_updated: Option<Instant>,
    /// Set by invalidation until the next successful write.
    pub invalidated: bool,
}

impl<D> QueryEntry<D> {
    pub(crate) fn empty(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            status: QueryStatus::Idle,
            error: None,
            last_updated: None,
            invalidated: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Stale when invalidated, never written, or older than `stale_time`.
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        if self.invalidated {
            return true;
        }
        match self.last_updated {
            Some(at) => at.elapsed() >= stale_time,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry_is_idle_and_stale() {
        let entry: QueryEntry<u32> = QueryEntry::empty(QueryKey::bare("users").unwrap());
        assert_eq!(entry.status, QueryStatus::Idle);
        assert!(entry.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn fresh_entry_is_not_stale_until_invalidated() {
        let mut entry: QueryEntry<u32> = QueryEntry::empty(QueryKey::bare("users").unwrap());
        entry.data = Some(1);
        entry.last_updated = Some(Instant::now());
        assert!(!entry.is_stale(Duration::from_secs(60)));
        assert!(entry.is_stale(Duration::ZERO));

        entry.invalidated = true;
        assert!(entry.is_stale(Duration::from_secs(60)));
    }
}
