//! Users dashboard client: a keyed query cache with optimistic
//! mutations over a remote users resource.

pub mod api;
pub mod config;
pub mod logging;
pub mod mutation;
pub mod queries;
pub mod query;
pub mod session;
pub mod store;
pub mod ui;
