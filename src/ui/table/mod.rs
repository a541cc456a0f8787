//! User table feature module.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Page, search, sort, company filter, open dialog
//! - `intent.rs` - User actions and page-load results
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `controller.rs` - Binds the state to the query cache and mutations

mod controller;
mod intent;
mod reducer;
mod state;

pub use controller::{UserTable, UsersView};
pub use intent::TableIntent;
pub use reducer::TableReducer;
pub use state::{CompanyFilter, TableDialog, TableState};
