//! Error scenario and edge case tests
//!
//! Run with: cargo test --test error_scenarios_tests
//! Covers:
//! - Configuration errors
//! - Classified API failures
//! - Storage edge cases

use campus::api::{classify, ApiError, ErrorKind};
use campus::auth::{FileStorage, SessionStore, Storage, SystemClock, SESSION_KEY};
use campus::error::Error;
use campus::Config;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Configuration Error Tests
// ============================================================================

#[test]
fn test_error_config_not_found() {
    let err = Error::ConfigNotFound;
    assert!(err.to_string().contains("campus init"));
}

#[test]
fn test_error_config_invalid_toml() {
    let result: Result<Config, _> = toml::from_str("this is [ not valid toml");
    assert!(result.is_err(), "Invalid TOML should fail to parse");

    let err: Error = result.unwrap_err().into();
    assert!(err.to_string().starts_with("TOML parse error"));
}

#[test]
fn test_config_wrong_type_rejected() {
    let result: Result<Config, _> = toml::from_str("[api]\ntimeout_ms = \"soon\"");
    assert!(result.is_err());
}

#[test]
fn test_config_partial_sections_get_defaults() {
    let config: Config = toml::from_str("[router]\nlogin_path = \"/signin\"").unwrap();
    assert_eq!(config.router.login_path, "/signin");
    assert_eq!(config.api.timeout_ms, 15_000);
}

// ============================================================================
// API Failure Tests
// ============================================================================

#[test]
fn test_api_error_wraps_transparently() {
    let err: Error = classify(Some(403), None).into();
    assert_eq!(err.to_string(), "You do not have permission to access this resource");
    assert_eq!(err.as_api().map(|e| e.kind), Some(ErrorKind::Forbidden));
}

#[test]
fn test_non_api_error_has_no_classification() {
    let err = Error::Storage("disk full".to_string());
    assert!(err.as_api().is_none());
}

#[test]
fn test_network_failure_has_no_status() {
    let ApiError { kind, status, .. } = classify(None, None);
    assert_eq!(kind, ErrorKind::NetworkUnavailable);
    assert_eq!(status, None);
}

#[test]
fn test_non_json_error_body_falls_back() {
    let payload = serde_json::from_str::<serde_json::Value>("<html>Bad Gateway</html>").ok();
    let err = classify(Some(499), payload.as_ref());
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert_eq!(err.message, "Unknown error");
}

// ============================================================================
// Storage Edge Cases
// ============================================================================

#[tokio::test]
async fn test_corrupt_session_file_starts_anonymous() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{{{").unwrap();

    let store = SessionStore::open(Arc::new(FileStorage::new(&path)), Arc::new(SystemClock)).await;
    assert!(store.is_hydrated());
    assert!(!store.is_authenticated().await);
}

#[tokio::test]
async fn test_expired_persisted_session_is_anonymous() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().join("session.json")));
    storage
        .set(
            SESSION_KEY,
            r#"{"token": "old", "token_type": "bearer", "expires_at": 1000, "user": null}"#,
        )
        .unwrap();

    let store = SessionStore::open(storage, Arc::new(SystemClock)).await;
    assert_eq!(store.snapshot().await.token, "old");
    assert!(!store.is_authenticated().await);
    assert_eq!(store.authorization().await, None);
}

#[tokio::test]
async fn test_unwritable_storage_does_not_fail_mutations() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be makes every write fail
    let path = dir.path().join("session.json");
    fs::create_dir(&path).unwrap();

    let store = SessionStore::new(Arc::new(FileStorage::new(&path)), Arc::new(SystemClock));
    store.hydrate().await;
    store.set_session("abc123", "bearer", 60).await;
    assert!(store.is_authenticated().await);

    store.clear_session().await;
    assert!(!store.is_authenticated().await);
}

#[tokio::test]
async fn test_session_saved_after_file_corruption() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{{{").unwrap();

    let store = SessionStore::open(Arc::new(FileStorage::new(&path)), Arc::new(SystemClock)).await;
    assert!(!store.is_authenticated().await);
    store.set_session("abc123", "bearer", 3600).await;

    let reopened = SessionStore::open(Arc::new(FileStorage::new(&path)), Arc::new(SystemClock)).await;
    assert!(reopened.is_authenticated().await);
    assert_eq!(reopened.authorization().await.as_deref(), Some("bearer abc123"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
}

#[tokio::test]
async fn test_logout_repairs_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{{{").unwrap();

    let store = SessionStore::open(Arc::new(FileStorage::new(&path)), Arc::new(SystemClock)).await;
    store.clear_session().await;

    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
}
