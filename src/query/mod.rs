//! Query cache: keyed results with loading/error state, invalidation,
//! cooperative cancellation, and change subscriptions.

mod cache;
mod entry;
mod key;

pub use cache::{CacheEvent, CacheEventKind, FetchTicket, QueryCache, Subscription};
pub use entry::{QueryEntry, QueryStatus};
pub use key::{CacheError, KeyPrefix, QueryKey};
