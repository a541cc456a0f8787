//! Pending/settled status of a mutation entry point, for the view.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::mutation::error::MutationError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed {
        message: String,
    },
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Observable state of one mutation entry point.
///
/// Clones share the same state; watchers see every transition.
#[derive(Clone)]
pub struct MutationTracker {
    sender: Arc<watch::Sender<MutationState>>,
}

impl Default for MutationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(MutationState::Idle);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn state(&self) -> MutationState {
        self.sender.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<MutationState> {
        self.sender.subscribe()
    }

    pub fn reset(&self) {
        self.sender.send_replace(MutationState::Idle);
    }

    /// Mark pending, run `mutation`, then record how it settled.
    pub async fn track<T, Fut>(&self, mutation: Fut) -> Result<T, MutationError>
    where
        Fut: Future<Output = Result<T, MutationError>>,
    {
        self.sender.send_replace(MutationState::Pending);
        let result = mutation.await;
        let settled = match &result {
            Ok(_) => MutationState::Succeeded,
            Err(err) => MutationState::Failed {
                message: err.user_message(),
            },
        };
        self.sender.send_replace(settled);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CacheError;

    #[tokio::test]
    async fn tracks_success() {
        let tracker = MutationTracker::new();
        let result = tracker.track(async { Ok::<_, MutationError>(5) }).await;
        assert_eq!(result.unwrap(), 5);
        assert_eq!(tracker.state(), MutationState::Succeeded);
        assert!(tracker.state().is_settled());
    }

    #[tokio::test]
    async fn tracks_failure_message() {
        let tracker = MutationTracker::new();
        let result = tracker
            .track(async { Err::<(), _>(MutationError::Target(CacheError::InvalidKey)) })
            .await;
        assert!(result.is_err());
        assert!(tracker.state().error_message().is_some());

        tracker.reset();
        assert_eq!(tracker.state(), MutationState::Idle);
    }

    #[tokio::test]
    async fn watcher_sees_pending() {
        let tracker = MutationTracker::new();
        let watcher = tracker.watch();
        let inner = tracker.clone();
        let observed = tracker
            .track(async move {
                let seen = watcher.borrow().clone();
                assert!(inner.state().is_pending());
                Ok::<_, MutationError>(seen)
            })
            .await
            .unwrap();
        assert_eq!(observed, MutationState::Pending);
    }
}
