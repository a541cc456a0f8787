use serde::{Deserialize, Serialize};

use crate::store::persist::{PersistentStore, StoreError};

pub const THEME_KEY: &str = "theme-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Theme preference, saved on every change.
pub struct ThemeStore {
    theme: Theme,
    store: Option<PersistentStore>,
}

impl ThemeStore {
    pub fn in_memory() -> Self {
        Self {
            theme: Theme::default(),
            store: None,
        }
    }

    pub fn load(store: PersistentStore) -> Result<Self, StoreError> {
        let theme = store.load_or_discard(THEME_KEY)?.unwrap_or_default();
        Ok(Self {
            theme,
            store: Some(store),
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Persist `theme`, then switch to it. A failed save keeps the old theme.
    pub fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        if let Some(store) = &self.store {
            store.save_persisted(THEME_KEY, &theme)?;
        }
        self.theme = theme;
        tracing::debug!(theme = theme.as_str(), "Theme changed");
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, StoreError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}
