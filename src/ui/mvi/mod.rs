//! Model-View-Intent primitives for the dashboard views.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: everything a view needs to render, cloned between steps
//! - **Intent**: a user action or a load result
//! - **Reducer**: the pure `(State, Intent) -> State` step

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
