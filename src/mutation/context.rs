use crate::query::{QueryCache, QueryEntry, QueryKey};

/// Pre-mutation snapshot of every affected cache entry.
///
/// Taken after in-flight fetches are cancelled and before the speculative
/// write. It is consumed exactly once: by [`rollback`](Self::rollback) on
/// failure or [`commit`](Self::commit) on success.
#[derive(Debug)]
pub struct MutationContext<D> {
    snapshots: Vec<(QueryKey, Option<QueryEntry<D>>)>,
}

impl<D: Clone> MutationContext<D> {
    pub fn capture(cache: &QueryCache<D>, targets: &[QueryKey]) -> Self {
        let mut snapshots: Vec<(QueryKey, Option<QueryEntry<D>>)> =
            Vec::with_capacity(targets.len());
        for key in targets {
            if snapshots.iter().any(|(seen, _)| seen == key) {
                continue;
            }
            snapshots.push((key.clone(), cache.get(key)));
        }
        Self { snapshots }
    }

    /// The snapshot for `key`: `Some(None)` means the entry was absent.
    pub fn snapshot(&self, key: &QueryKey) -> Option<&Option<QueryEntry<D>>> {
        self.snapshots
            .iter()
            .find(|(seen, _)| seen == key)
            .map(|(_, entry)| entry)
    }

    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.snapshots.iter().map(|(key, _)| key)
    }

    /// Put every entry back exactly as captured. Entries that did not exist
    /// are removed. Returns the number of keys restored.
    pub fn rollback(self, cache: &QueryCache<D>) -> usize {
        let count = self.snapshots.len();
        for (key, entry) in self.snapshots {
            cache.restore(&key, entry);
        }
        count
    }

    /// Discard the snapshot; the speculative state stands.
    pub fn commit(self) {}
}
