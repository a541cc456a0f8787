use serde::{Deserialize, Serialize};

use crate::store::persist::{PersistentStore, StoreError};

pub const AUTH_KEY: &str = "auth-store";

/// The signed-in user shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedInUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl LoggedInUser {
    /// Hard-coded demo account; there is no real sign-in.
    pub fn mock() -> Self {
        Self {
            id: 1,
            name: "Leanne Graham".to_string(),
            email: "Sincere@april.biz".to_string(),
        }
    }
}

pub struct AuthStore {
    user: Option<LoggedInUser>,
    store: Option<PersistentStore>,
}

impl AuthStore {
    pub fn in_memory() -> Self {
        Self {
            user: Some(LoggedInUser::mock()),
            store: None,
        }
    }

    pub fn load(store: PersistentStore) -> Result<Self, StoreError> {
        let user = store
            .load_or_discard(AUTH_KEY)?
            .unwrap_or_else(LoggedInUser::mock);
        Ok(Self {
            user: Some(user),
            store: Some(store),
        })
    }

    pub fn user(&self) -> Option<&LoggedInUser> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: LoggedInUser) -> Result<(), StoreError> {
        if let Some(store) = &self.store {
            store.save_persisted(AUTH_KEY, &user)?;
        }
        self.user = Some(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn starts_with_mock_user() {
        let auth = AuthStore::in_memory();
        assert_eq!(auth.user().map(|u| u.name.as_str()), Some("Leanne Graham"));
    }

    #[test]
    fn set_user_persists() {
        let dir = TempDir::new().unwrap();
        let store = PersistentStore::new(dir.path().to_path_buf());
        let mut auth = AuthStore::load(store.clone()).unwrap();
        auth.set_user(LoggedInUser {
            id: 2,
            name: "Ervin Howell".to_string(),
            email: "Shanna@melissa.tv".to_string(),
        })
        .unwrap();

        let reloaded = AuthStore::load(store).unwrap();
        assert_eq!(reloaded.user().map(|u| u.id), Some(2));
    }
}
