mod common;

use std::time::Duration;

use common::temp_config;
use userdash::config::{Config, ConfigError};

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "https://jsonplaceholder.typicode.com");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.api.connect_timeout_seconds, 5);
    assert_eq!(config.table.page_size, 5);
    assert_eq!(config.table.stale_time(), Duration::from_secs(30));
    assert_eq!(config.table.companies_stale_time(), Duration::from_secs(60));
    assert!(config.storage.dir.is_none());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("userdash/config.toml"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let (_dir, path) = temp_config(
        r#"
[api]
base_url = "http://localhost:3000"
timeout_seconds = 0

[table]
page_size = 10
"#,
    );
    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.request_timeout(), None);
    assert_eq!(config.api.connect_timeout(), Duration::from_secs(5));
    assert_eq!(config.table.page_size, 10);
    assert_eq!(config.table.stale_time_seconds, 30);
}

#[test]
fn test_storage_dir_override() {
    let (_dir, path) = temp_config(
        r#"
[storage]
dir = "/tmp/userdash-state"
"#,
    );
    let config = Config::load_from(&path).unwrap();
    assert_eq!(
        config.storage.resolve_dir(),
        std::path::PathBuf::from("/tmp/userdash-state")
    );
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let (_dir, path) = temp_config("[api\nbase_url = ");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_zero_page_size_is_rejected() {
    let (_dir, path) = temp_config("[table]\npage_size = 0\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_non_http_base_url_is_rejected() {
    let (_dir, path) = temp_config("[api]\nbase_url = \"file:///etc/passwd\"\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}
