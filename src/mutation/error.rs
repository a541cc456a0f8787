use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::query::CacheError;

/// Which write was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Errors surfaced by the mutation coordinator.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The request failed; speculative writes were rolled back.
    #[error("Failed to {kind} user ({rolled_back} cache entries rolled back): {source}")]
    Request {
        kind: MutationKind,
        rolled_back: usize,
        #[source]
        source: ApiError,
    },

    /// A target key could not be built.
    #[error("Invalid mutation target: {0}")]
    Target(#[from] CacheError),
}

impl MutationError {
    /// Text suitable for showing to a person.
    pub fn user_message(&self) -> String {
        match self {
            MutationError::Request { kind, source, .. } => {
                format!("Failed to {kind} user. {}", source.user_message())
            }
            MutationError::Target(_) => "Something went wrong. Please retry.".to_string(),
        }
    }
}
