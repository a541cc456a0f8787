use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Settings for the remote users API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the users service (e.g., "https://jsonplaceholder.typicode.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds. Zero disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Settings for the paginated user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page (default: 5).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How long a fetched users page stays fresh (default: 30).
    #[serde(default = "default_stale_time")]
    pub stale_time_seconds: u64,
    /// How long the company list stays fresh (default: 60).
    #[serde(default = "default_companies_stale_time")]
    pub companies_stale_time_seconds: u64,
}

/// Where persisted client state (activity log, theme, auth) lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the storage directory. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_page_size() -> u32 {
    5
}

fn default_stale_time() -> u64 {
    30
}

fn default_companies_stale_time() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            stale_time_seconds: default_stale_time(),
            companies_stale_time_seconds: default_companies_stale_time(),
        }
    }
}

impl ApiConfig {
    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(u64::from(self.timeout_seconds)))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }
}

impl TableConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_seconds)
    }

    pub fn companies_stale_time(&self) -> Duration {
        Duration::from_secs(self.companies_stale_time_seconds)
    }
}

impl StorageConfig {
    /// Resolved storage directory.
    ///
    /// Uses `~/.local/share/userdash` on Linux or the platform equivalent
    /// via `dirs::data_dir()`, falling back to the current directory.
    pub fn resolve_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("userdash"),
        }
    }
}
