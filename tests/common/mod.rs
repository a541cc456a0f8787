//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::Notify;

use userdash::api::{
    Address, ApiError, Company, ListParams, SortOrder, User, UserDraft, UsersApi,
};
use userdash::config::{Config, TableConfig};
use userdash::queries::QueryData;
use userdash::query::{QueryCache, QueryKey};

// -- Fixtures -----------------------------------------------------------------

const FIXTURE: [(&str, &str, &str, &str); 10] = [
    ("Leanne Graham", "Sincere@april.biz", "1-770-736-8031", "Romaguera-Crona"),
    ("Ervin Howell", "Shanna@melissa.tv", "010-692-6593", "Deckow-Crist"),
    ("Clementine Bauch", "Nathan@yesenia.net", "1-463-123-4447", "Romaguera-Jacobson"),
    ("Patricia Lebsack", "Julianne.OConner@kory.org", "493-170-9623", "Robel-Corkery"),
    ("Chelsey Dietrich", "Lucio_Hettinger@annie.ca", "(254)954-1289", "Keebler LLC"),
    ("Mrs. Dennis Schulist", "Karley_Dach@jasper.info", "1-477-935-8478", "Considine-Lockman"),
    ("Kurtis Weissnat", "Telly.Hoeger@billy.biz", "210.067.6132", "Johns Group"),
    ("Eleanor Runolfsdottir", "Sherwood@rosamond.me", "586.493.6943", "Abernathy Group"),
    ("Glenna Reichert", "Chaim_McDermott@dana.io", "(775)976-6794", "Yost and Sons"),
    ("Clementina DuBuque", "Rey.Padberg@karina.biz", "024-648-3804", "Hoeger LLC"),
];

/// Ten users with ids 1..=10. Exactly two names contain "lea".
pub fn fixture_users() -> Vec<User> {
    FIXTURE
        .iter()
        .enumerate()
        .map(|(i, (name, email, phone, company))| User {
            id: i as u64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            company: Company {
                name: company.to_string(),
            },
            address: Address {
                street: format!("{} Main St", 100 + i),
                suite: format!("Apt. {}", 500 + i),
                city: "Gwenborough".to_string(),
                zipcode: format!("92998-38{i:02}"),
            },
        })
        .collect()
}

pub fn fixture_user(id: u64) -> User {
    fixture_users()
        .into_iter()
        .find(|u| u.id == id)
        .expect("fixture id")
}

pub fn ada_draft() -> UserDraft {
    UserDraft {
        name: "Ada Lovelace".to_string(),
        email: "ada@x.io".to_string(),
        phone: "555-0100".to_string(),
        company: "Analytical Engines".to_string(),
    }
}

pub fn table_config() -> TableConfig {
    TableConfig {
        page_size: 5,
        ..TableConfig::default()
    }
}

/// Put a users page straight into the cache.
pub fn seed_page(cache: &QueryCache<QueryData>, key: &QueryKey, users: Vec<User>) {
    cache.set(key, |_| QueryData::Users(users));
}

pub fn cached_ids(cache: &QueryCache<QueryData>, key: &QueryKey) -> Option<Vec<u64>> {
    cache
        .data(key)
        .and_then(|data| data.users().map(|users| users.iter().map(|u| u.id).collect()))
}

/// Write a config file into a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

// -- Fake API -----------------------------------------------------------------

/// A pause point inside one fake API call.
///
/// The call signals `entered` and then waits for `release`.
#[derive(Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Wait until the gated call is in flight.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call finish.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
struct FakeState {
    users: Vec<User>,
    calls: Vec<&'static str>,
    fail_next: HashSet<&'static str>,
    fail_always: HashSet<&'static str>,
    gates: HashMap<&'static str, Gate>,
}

/// In-memory users API with json-server paging, search, and sort.
///
/// Writes persist in memory so a refetch sees them. Failures and pauses
/// can be scripted per operation name (`"list_users"`, `"create_user"`, ...).
#[derive(Default)]
pub struct FakeUsersApi {
    state: Mutex<FakeState>,
}

impl FakeUsersApi {
    pub fn new() -> Arc<Self> {
        Self::with_users(fixture_users())
    }

    pub fn empty() -> Arc<Self> {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<User>) -> Arc<Self> {
        let api = Self::default();
        api.state.lock().users = users;
        Arc::new(api)
    }

    /// Fail the next call of `operation` with HTTP 500.
    pub fn fail_next(&self, operation: &'static str) {
        self.state.lock().fail_next.insert(operation);
    }

    /// Fail every call of `operation` with HTTP 500 until [`recover`](Self::recover).
    pub fn fail_always(&self, operation: &'static str) {
        self.state.lock().fail_always.insert(operation);
    }

    pub fn recover(&self) {
        let mut state = self.state.lock();
        state.fail_next.clear();
        state.fail_always.clear();
    }

    /// Pause the next call of `operation` until the returned gate is released.
    pub fn gate(&self, operation: &'static str) -> Gate {
        let gate = Gate::default();
        self.state.lock().gates.insert(operation, gate.clone());
        gate
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Record the call, wait at its gate if any, then apply scripted failure.
    async fn enter(&self, operation: &'static str) -> Result<(), ApiError> {
        let gate = {
            let mut state = self.state.lock();
            state.calls.push(operation);
            state.gates.remove(operation)
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let mut state = self.state.lock();
        let failing = state.fail_next.remove(operation) || state.fail_always.contains(operation);
        if failing {
            return Err(ApiError::HttpStatus {
                operation,
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(operation: &'static str) -> ApiError {
        ApiError::HttpStatus {
            operation,
            status: 404,
            message: "{}".to_string(),
        }
    }
}

#[async_trait]
impl UsersApi for FakeUsersApi {
    async fn list_users(&self, params: &ListParams) -> Result<Vec<User>, ApiError> {
        self.enter("list_users").await?;
        let mut users = self.users();

        if let Some(q) = params.search.as_deref().filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            users.retain(|u| {
                u.name.to_lowercase().contains(&q) || u.email.to_lowercase().contains(&q)
            });
        }
        if let Some(company) = params.company.as_deref() {
            users.retain(|u| u.company.name == company);
        }
        if let Some(order) = params.sort_email {
            users.sort_by(|a, b| a.email.cmp(&b.email));
            if order == SortOrder::Desc {
                users.reverse();
            }
        }

        let limit = params.limit as usize;
        let skip = (params.page.max(1) as usize - 1) * limit;
        Ok(users.into_iter().skip(skip).take(limit).collect())
    }

    async fn list_all_users(&self) -> Result<Vec<User>, ApiError> {
        self.enter("list_all_users").await?;
        Ok(self.users())
    }

    async fn get_user(&self, id: u64) -> Result<User, ApiError> {
        self.enter("get_user").await?;
        self.users()
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| Self::not_found("get_user"))
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        self.enter("create_user").await?;
        let mut state = self.state.lock();
        let id = state.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User::from_draft(id, draft);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<(), ApiError> {
        self.enter("update_user").await?;
        let mut state = self.state.lock();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Self::not_found("update_user"))?;
        user.apply(draft);
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        self.enter("delete_user").await?;
        self.state.lock().users.retain(|u| u.id != id);
        Ok(())
    }
}
