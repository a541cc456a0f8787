//! Mutation coordinator: optimistic create/update/delete with snapshot
//! rollback.

mod context;
mod coordinator;
mod error;
mod state;
pub mod transform;

pub use context::MutationContext;
pub use coordinator::MutationCoordinator;
pub use error::{MutationError, MutationKind};
pub use state::{MutationState, MutationTracker};
