//! Speculative cache transforms applied before the server answers.
//!
//! Each transform returns `None` to leave an entry untouched.

use rand::Rng;

use crate::api::{User, UserDraft};
use crate::queries::QueryData;

/// Upper bound (exclusive) for client-synthesized ids.
pub const PROVISIONAL_ID_RANGE: u64 = 100_000;

/// Random id for a record the server has not assigned yet.
///
/// Provisional: the next successful refetch replaces it with the server's id.
pub fn provisional_id() -> u64 {
    rand::thread_rng().gen_range(0..PROVISIONAL_ID_RANGE)
}

/// Put `user` at the head of a users page, keeping at most `limit` rows.
pub fn prepend_user(old: Option<&QueryData>, user: &User, limit: usize) -> Option<QueryData> {
    let rest: &[User] = match old {
        None => &[],
        Some(QueryData::Users(users)) => users,
        Some(_) => return None,
    };
    let mut users = Vec::with_capacity(rest.len() + 1);
    users.push(user.clone());
    users.extend(rest.iter().cloned());
    users.truncate(limit);
    Some(QueryData::Users(users))
}

/// Apply `draft` to the record with `id` in a page or detail entry.
pub fn patch_user(old: Option<&QueryData>, id: u64, draft: &UserDraft) -> Option<QueryData> {
    match old? {
        QueryData::Users(users) => Some(QueryData::Users(
            users
                .iter()
                .map(|user| {
                    let mut user = user.clone();
                    if user.id == id {
                        user.apply(draft);
                    }
                    user
                })
                .collect(),
        )),
        QueryData::User(user) if user.id == id => {
            let mut user = user.clone();
            user.apply(draft);
            Some(QueryData::User(user))
        }
        _ => None,
    }
}

/// Drop the record with `id` from a users page.
pub fn remove_user(old: Option<&QueryData>, id: u64) -> Option<QueryData> {
    match old? {
        QueryData::Users(users) => Some(QueryData::Users(
            users.iter().filter(|user| user.id != id).cloned().collect(),
        )),
        _ => None,
    }
}
