//! Optimistic writes against the users API.
//!
//! Every mutation runs the same sequence:
//!
//! ```text
//! cancel in-flight fetches → snapshot → speculative write + activity entry
//!     → network call → success: keep | failure: rollback → invalidate
//! ```
//!
//! Two mutations racing on one key each roll back to their own snapshot,
//! so a late failure can undo the other mutation's speculative write. The
//! invalidation that follows every mutation re-syncs with the server.

use std::sync::Arc;

use crate::api::{ApiError, User, UserDraft, UsersApi};
use crate::mutation::context::MutationContext;
use crate::mutation::error::{MutationError, MutationKind};
use crate::mutation::transform;
use crate::queries::QueryData;
use crate::query::{KeyPrefix, QueryCache, QueryKey};
use crate::store::{ActivityKind, ActivityLog};

pub struct MutationCoordinator<A: ?Sized> {
    api: Arc<A>,
    cache: QueryCache<QueryData>,
    activity: ActivityLog,
    page_size: usize,
}

impl<A: UsersApi + ?Sized> MutationCoordinator<A> {
    pub fn new(
        api: Arc<A>,
        cache: QueryCache<QueryData>,
        activity: ActivityLog,
        page_size: usize,
    ) -> Self {
        Self {
            api,
            cache,
            activity,
            page_size,
        }
    }

    pub fn cache(&self) -> &QueryCache<QueryData> {
        &self.cache
    }

    /// Create a user, showing it at the head of each target page right away.
    ///
    /// The speculative row carries a provisional id; the returned user has
    /// the id the server assigned.
    pub async fn create_user(
        &self,
        draft: UserDraft,
        targets: &[QueryKey],
    ) -> Result<User, MutationError> {
        let provisional = User::from_draft(transform::provisional_id(), &draft);
        let limit = self.page_size;
        let context = self.begin(MutationKind::Create, targets, |old| {
            transform::prepend_user(old, &provisional, limit)
        });
        self.activity
            .record(ActivityKind::Add, format!("Added user {}", draft.name));

        let result = self.api.create_user(&draft).await;
        self.settle(MutationKind::Create, targets, context, result)
    }

    /// Update a user, patching matching rows and detail entries right away.
    pub async fn update_user(
        &self,
        id: u64,
        draft: UserDraft,
        targets: &[QueryKey],
    ) -> Result<(), MutationError> {
        let context = self.begin(MutationKind::Update, targets, |old| {
            transform::patch_user(old, id, &draft)
        });
        self.activity
            .record(ActivityKind::Edit, format!("Edited user #{id}"));

        let result = self.api.update_user(id, &draft).await;
        self.settle(MutationKind::Update, targets, context, result)
    }

    /// Delete a user, removing it from each target page right away.
    pub async fn delete_user(&self, id: u64, targets: &[QueryKey]) -> Result<(), MutationError> {
        let context = self.begin(MutationKind::Delete, targets, |old| {
            transform::remove_user(old, id)
        });
        self.activity
            .record(ActivityKind::Delete, format!("Deleted user #{id}"));

        let result = self.api.delete_user(id).await;
        self.settle(MutationKind::Delete, targets, context, result)
    }

    /// Cancel, snapshot, and apply the speculative transform to every target.
    fn begin<F>(
        &self,
        kind: MutationKind,
        targets: &[QueryKey],
        speculative: F,
    ) -> MutationContext<QueryData>
    where
        F: Fn(Option<&QueryData>) -> Option<QueryData>,
    {
        for prefix in operation_prefixes(targets) {
            self.cache.cancel(&prefix);
        }

        let context = MutationContext::capture(&self.cache, targets);

        let mut written = 0usize;
        for key in context.keys() {
            if self.cache.set_with(key, &speculative) {
                written += 1;
            }
        }
        tracing::info!(
            kind = %kind,
            targets = targets.len(),
            written,
            "Speculative update applied"
        );
        context
    }

    /// Keep or roll back, then invalidate so the next read reflects the server.
    fn settle<T>(
        &self,
        kind: MutationKind,
        targets: &[QueryKey],
        context: MutationContext<QueryData>,
        result: Result<T, ApiError>,
    ) -> Result<T, MutationError> {
        let outcome = match result {
            Ok(value) => {
                context.commit();
                tracing::info!(kind = %kind, "Mutation committed");
                Ok(value)
            }
            Err(source) => {
                let rolled_back = context.rollback(&self.cache);
                tracing::warn!(
                    kind = %kind,
                    rolled_back,
                    error = %source,
                    "Mutation failed, speculative update rolled back"
                );
                Err(MutationError::Request {
                    kind,
                    rolled_back,
                    source,
                })
            }
        };

        for prefix in operation_prefixes(targets) {
            self.cache.invalidate(&prefix);
        }
        outcome
    }
}

/// One prefix per distinct operation among `targets`.
///
/// A write to one page shifts the others, so cancel and invalidate act on
/// the whole operation rather than the exact keys.
fn operation_prefixes(targets: &[QueryKey]) -> Vec<KeyPrefix> {
    let mut prefixes: Vec<KeyPrefix> = Vec::new();
    for key in targets {
        let prefix = key.operation_prefix();
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }
    prefixes
}
