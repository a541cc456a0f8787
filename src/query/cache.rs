//! Keyed query cache with stale-while-revalidate reads.
//!
//! The cache is an explicitly constructed handle; clones share the same
//! store. All mutation happens through the methods below and the lock is
//! never held across an await point, so the sequence
//! cancel → snapshot → speculative write → network → reconcile observed by
//! one task cannot be interleaved by another task's cache calls.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::query::entry::{QueryEntry, QueryStatus};
use crate::query::key::{KeyPrefix, QueryKey};

/// What happened to a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    Loading,
    Updated,
    Failed,
    Invalidated,
    Cancelled,
    Restored,
    Removed,
}

/// Notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub kind: CacheEventKind,
}

/// Receiving side of a cache subscription. Dropping it unsubscribes.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<CacheEvent>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the cache is cleared.
    pub async fn recv(&mut self) -> Option<CacheEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<CacheEvent> {
        self.receiver.try_recv().ok()
    }

    /// Everything queued right now.
    pub fn drain(&mut self) -> Vec<CacheEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Proof that a fetch was started; required to write its result.
#[derive(Debug)]
pub struct FetchTicket {
    key: QueryKey,
    id: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

struct Slot<D> {
    entry: QueryEntry<D>,
    /// Ticket id whose result may still land here.
    active_fetch: Option<u64>,
    status_before_fetch: QueryStatus,
}

struct Subscriber {
    filter: Option<KeyPrefix>,
    sender: mpsc::UnboundedSender<CacheEvent>,
}

struct CacheInner<D> {
    slots: HashMap<QueryKey, Slot<D>>,
    next_fetch_id: u64,
    subscribers: Vec<Subscriber>,
}

impl<D> CacheInner<D> {
    fn notify(&mut self, key: &QueryKey, kind: CacheEventKind) {
        self.subscribers.retain(|sub| {
            if sub.filter.as_ref().is_some_and(|f| !f.matches(key)) {
                return !sub.sender.is_closed();
            }
            sub.sender
                .send(CacheEvent {
                    key: key.clone(),
                    kind,
                })
                .is_ok()
        });
    }

    fn slot_mut(&mut self, key: &QueryKey) -> &mut Slot<D> {
        self.slots.entry(key.clone()).or_insert_with(|| Slot {
            entry: QueryEntry::empty(key.clone()),
            active_fetch: None,
            status_before_fetch: QueryStatus::Idle,
        })
    }
}

/// Process-wide keyed store of query results.
///
/// At most one entry exists per [`QueryKey`].
pub struct QueryCache<D> {
    inner: Arc<Mutex<CacheInner<D>>>,
}

impl<D> Clone for QueryCache<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Clone> Default for QueryCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> QueryCache<D> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                slots: HashMap::new(),
                next_fetch_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<QueryEntry<D>> {
        self.inner.lock().slots.get(key).map(|slot| slot.entry.clone())
    }

    /// Cached data for `key`, if any.
    pub fn data(&self, key: &QueryKey) -> Option<D> {
        self.inner
            .lock()
            .slots
            .get(key)
            .and_then(|slot| slot.entry.data.clone())
    }

    pub fn keys_matching(&self, prefix: &KeyPrefix) -> Vec<QueryKey> {
        self.inner
            .lock()
            .slots
            .keys()
            .filter(|key| prefix.matches(key))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the data for `key` with `updater(old)`.
    ///
    /// Marks the entry successful and fresh, and notifies subscribers.
    pub fn set<F>(&self, key: &QueryKey, updater: F)
    where
        F: FnOnce(Option<&D>) -> D,
    {
        self.set_with(key, |old| Some(updater(old)));
    }

    /// Like [`set`](Self::set), but the updater may decline by returning
    /// `None`, leaving the entry untouched. Returns whether a write happened.
    pub fn set_with<F>(&self, key: &QueryKey, updater: F) -> bool
    where
        F: FnOnce(Option<&D>) -> Option<D>,
    {
        let mut inner = self.inner.lock();
        let old = inner.slots.get(key).and_then(|slot| slot.entry.data.as_ref());
        let Some(data) = updater(old) else {
            return false;
        };

        let slot = inner.slot_mut(key);
        slot.entry.data = Some(data);
        slot.entry.status = QueryStatus::Success;
        slot.entry.error = None;
        slot.entry.last_updated = Some(Instant::now());
        slot.entry.invalidated = false;
        inner.notify(key, CacheEventKind::Updated);
        tracing::trace!(key = %key, "Cache entry set");
        true
    }

    /// Put back a snapshot taken earlier, or drop the entry if there was none.
    ///
    /// In-flight fetch tickets stay valid; only `cancel` revokes them. When
    /// the entry is dropped, a fetch that began after the snapshot loses its
    /// result: [`complete_fetch`](Self::complete_fetch) finds no entry and
    /// returns `false`. With nothing cached, the next read fetches again.
    pub fn restore(&self, key: &QueryKey, snapshot: Option<QueryEntry<D>>) {
        let mut inner = self.inner.lock();
        match snapshot {
            Some(entry) => {
                inner.slot_mut(key).entry = entry;
                inner.notify(key, CacheEventKind::Restored);
            }
            None => {
                if inner.slots.remove(key).is_some() {
                    inner.notify(key, CacheEventKind::Removed);
                }
            }
        }
        tracing::debug!(key = %key, "Cache entry restored");
    }

    /// Mark every entry under `prefix` stale. Data stays visible.
    ///
    /// Subscribers receive [`CacheEventKind::Invalidated`] and are expected to
    /// refetch the keys they are showing.
    pub fn invalidate(&self, prefix: &KeyPrefix) -> Vec<QueryKey> {
        let mut inner = self.inner.lock();
        let keys: Vec<QueryKey> = inner
            .slots
            .keys()
            .filter(|key| prefix.matches(key))
            .cloned()
            .collect();
        for key in &keys {
            if let Some(slot) = inner.slots.get_mut(key) {
                slot.entry.invalidated = true;
            }
            inner.notify(key, CacheEventKind::Invalidated);
        }
        tracing::debug!(count = keys.len(), "Cache entries invalidated");
        keys
    }

    /// Revoke the tickets of in-flight fetches under `prefix`.
    ///
    /// The requests keep running; their results are discarded when they
    /// resolve. Entries go back to the status they had before the fetch.
    /// Returns the number of fetches cancelled.
    pub fn cancel(&self, prefix: &KeyPrefix) -> usize {
        let mut inner = self.inner.lock();
        let keys: Vec<QueryKey> = inner
            .slots
            .iter()
            .filter(|(key, slot)| slot.active_fetch.is_some() && prefix.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            if let Some(slot) = inner.slots.get_mut(key) {
                slot.active_fetch = None;
                if slot.entry.status == QueryStatus::Loading {
                    slot.entry.status = slot.status_before_fetch;
                }
            }
            inner.notify(key, CacheEventKind::Cancelled);
        }
        if !keys.is_empty() {
            tracing::debug!(count = keys.len(), "In-flight fetches cancelled");
        }
        keys.len()
    }

    /// Move `key` to `loading` and hand out the ticket for its result.
    ///
    /// A newer ticket for the same key supersedes older ones.
    pub fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut inner = self.inner.lock();
        inner.next_fetch_id += 1;
        let id = inner.next_fetch_id;

        let slot = inner.slot_mut(key);
        if slot.entry.status != QueryStatus::Loading {
            slot.status_before_fetch = slot.entry.status;
        }
        slot.entry.status = QueryStatus::Loading;
        slot.active_fetch = Some(id);
        inner.notify(key, CacheEventKind::Loading);

        FetchTicket {
            key: key.clone(),
            id,
        }
    }

    /// Write a fetch result if its ticket is still current.
    ///
    /// On failure the last good data is kept (stale-while-error). Returns
    /// whether the result was applied.
    pub fn complete_fetch<E: Display>(&self, ticket: FetchTicket, result: Result<D, E>) -> bool {
        let mut inner = self.inner.lock();
        let key = ticket.key;
        let Some(slot) = inner.slots.get_mut(&key) else {
            tracing::debug!(key = %key, fetch = ticket.id, "Fetch result for removed entry discarded");
            return false;
        };
        if slot.active_fetch != Some(ticket.id) {
            tracing::trace!(key = %key, fetch = ticket.id, "Superseded fetch result discarded");
            return false;
        }
        slot.active_fetch = None;

        let kind = match result {
            Ok(data) => {
                slot.entry.data = Some(data);
                slot.entry.status = QueryStatus::Success;
                slot.entry.error = None;
                slot.entry.last_updated = Some(Instant::now());
                slot.entry.invalidated = false;
                CacheEventKind::Updated
            }
            Err(err) => {
                slot.entry.status = QueryStatus::Error;
                slot.entry.error = Some(err.to_string());
                CacheEventKind::Failed
            }
        };
        inner.notify(&key, kind);
        true
    }

    /// Run `fetcher` for `key` and record its outcome.
    ///
    /// The fetcher's own result is returned whether or not the cache kept
    /// it; read the cache to see what the view should show.
    pub async fn fetch<F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> Result<D, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D, E>>,
        E: Display,
    {
        let ticket = self.begin_fetch(key);
        let result = fetcher().await;
        match &result {
            Ok(data) => {
                self.complete_fetch::<E>(ticket, Ok(data.clone()));
            }
            Err(err) => {
                self.complete_fetch(ticket, Err::<D, _>(err.to_string()));
            }
        }
        result
    }

    /// Return cached data when fresh, otherwise fetch.
    pub async fn ensure<F, Fut, E>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<D, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D, E>>,
        E: Display,
    {
        if let Some(entry) = self.get(key) {
            if let Some(data) = entry.data.as_ref().filter(|_| !entry.is_stale(stale_time)) {
                tracing::trace!(key = %key, "Serving fresh cache entry");
                return Ok(data.clone());
            }
        }
        self.fetch(key, fetcher).await
    }

    /// Receive events for keys under `filter`, or all keys when `None`.
    pub fn subscribe(&self, filter: Option<KeyPrefix>) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(Subscriber { filter, sender });
        Subscription { receiver }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|sub| !sub.sender.is_closed());
        inner.subscribers.len()
    }

    /// Drop every entry and subscriber. Used at session teardown.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.subscribers.clear();
        tracing::debug!("Query cache cleared");
    }
}
