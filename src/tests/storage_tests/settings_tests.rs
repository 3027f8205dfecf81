// Settings Tests - Testing Settings load/save and defaults

use crate::storage::Settings;
use crate::storage::settings::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.request_timeout_secs, 10);
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    assert_eq!(settings.session_path, "./data/session.json");
}

#[test]
fn test_settings_load_missing_file_returns_default() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nope.json");

    let settings = Settings::load(&path).expect("Failed to load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_load_empty_file_returns_default() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");

    let settings = Settings::load(temp_file.path()).expect("Failed to load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_save_and_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = Settings::default();
    settings.api_base_url = "http://localhost:8080".to_string();
    settings.request_timeout_secs = 3;
    settings.save(&path).expect("Failed to save settings");

    let loaded = Settings::load(&path).expect("Failed to load settings");
    assert_eq!(loaded, settings);
}

#[test]
fn test_settings_partial_file_fills_defaults() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), r#"{ "request_timeout_secs": 30 }"#).expect("Failed to write");

    let settings = Settings::load(temp_file.path()).expect("Failed to load settings");

    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn test_settings_corrupt_file_is_an_error() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), "{ not json").expect("Failed to write");

    let result = Settings::load(temp_file.path());

    assert!(matches!(result, Err(crate::Error::Storage(_))));
}

#[test]
fn test_zero_timeout_falls_back_to_default() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), r#"{ "request_timeout_secs": 0 }"#).expect("Failed to write");

    let settings = Settings::load(temp_file.path()).expect("Failed to load settings");
    assert_eq!(settings.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));

    let built = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(built.request_timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
}
