//! Remote users resource: record types, the client trait, and its HTTP
//! implementation.

mod client;
mod error;
mod types;

pub use client::{HttpUsersClient, UsersApi};
pub use error::ApiError;
pub use types::{
    filter_by_search, unique_companies, Address, Company, ListParams, SortOrder, User, UserDraft,
};
