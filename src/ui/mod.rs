//! View binding layer: turns user actions into queries and mutations and
//! cache state into something to show.

pub mod detail;
pub mod form;
pub mod mvi;
pub mod render;
pub mod table;

pub use detail::{load_user_detail, DetailView};
pub use form::{SubmitError, UserForm, ValidationError, ValidationErrors};
pub use table::{TableIntent, UserTable, UsersView};
