//! Client-side state persisted between sessions: activity log, theme,
//! and the mock signed-in user.

mod activity;
mod auth;
mod persist;
mod theme;

pub use activity::{Activity, ActivityKind, ActivityLog, ACTIVITY_KEY};
pub use auth::{AuthStore, LoggedInUser, AUTH_KEY};
pub use persist::{PersistentStore, StoreError};
pub use theme::{Theme, ThemeStore, THEME_KEY};
