//! Activity log of user-visible actions, newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::store::persist::{PersistentStore, StoreError};

pub const ACTIVITY_KEY: &str = "activity-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Add,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Shared, optionally persisted activity log.
///
/// Persistence failures are logged and never fail the action being recorded.
#[derive(Clone)]
pub struct ActivityLog {
    entries: Arc<Mutex<Vec<Activity>>>,
    store: Option<PersistentStore>,
}

impl ActivityLog {
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            store: None,
        }
    }

    /// Load the log saved under [`ACTIVITY_KEY`], starting empty if none
    /// or if the saved file is unreadable.
    pub fn load(store: PersistentStore) -> Result<Self, StoreError> {
        let entries: Vec<Activity> = store.load_or_discard(ACTIVITY_KEY)?.unwrap_or_default();
        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            store: Some(store),
        })
    }

    pub fn record(&self, kind: ActivityKind, message: impl Into<String>) -> Activity {
        let activity = Activity {
            id: uuid::Uuid::new_v4().simple().to_string(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        };
        tracing::info!(kind = ?kind, message = %activity.message, "Activity recorded");

        let mut entries = self.entries.lock();
        entries.insert(0, activity.clone());
        self.persist(&entries);
        activity
    }

    pub fn entries(&self) -> Vec<Activity> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.persist(&entries);
    }

    fn persist(&self, entries: &[Activity]) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_persisted(ACTIVITY_KEY, entries) {
                tracing::warn!(error = %e, "Failed to persist activity log");
            }
        }
    }
}
