// Session Tests - Testing the two-key session cache

use crate::storage::{SessionStore, User};
use tempfile::TempDir;

fn sample_user() -> User {
    let mut user = User::new("42", "Ada Lovelace", "ada@example.com");
    user.expertise = Some("Rust".to_string());
    user
}

#[test]
fn test_open_missing_file_is_logged_out() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let session = SessionStore::open(dir.path().join("session.json")).expect("Failed to open session");

    assert!(!session.is_logged_in());
    assert!(session.token().is_none());
    assert!(session.user().is_none());
}

#[test]
fn test_store_auth_data_persists_both_keys() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("session.json");

    let mut session = SessionStore::open(&path).expect("Failed to open session");
    session
        .store_auth_data("token-abc", sample_user())
        .expect("Failed to store auth data");

    let reopened = SessionStore::open(&path).expect("Failed to reopen session");
    assert!(reopened.is_logged_in());
    assert_eq!(reopened.token(), Some("token-abc"));
    assert_eq!(reopened.user(), Some(&sample_user()));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).expect("Session file is not JSON");
    assert_eq!(raw["user_token"], "token-abc");
    assert_eq!(raw["user_data"]["id"], "42");
}

#[test]
fn test_update_user_keeps_token() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let mut session = SessionStore::open(&path).expect("Failed to open session");
    session.store_auth_data("tok", sample_user()).unwrap();

    let mut updated = sample_user();
    updated.location = Some("London".to_string());
    session.update_user(updated.clone()).expect("Failed to update user");

    let reopened = SessionStore::open(&path).unwrap();
    assert_eq!(reopened.token(), Some("tok"));
    assert_eq!(reopened.user().and_then(|u| u.location.as_deref()), Some("London"));
}

#[test]
fn test_clear_removes_both_keys() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let mut session = SessionStore::open(&path).unwrap();
    session.store_auth_data("tok", sample_user()).unwrap();
    session.clear().expect("Failed to clear session");

    assert!(!session.is_logged_in());
    let reopened = SessionStore::open(&path).unwrap();
    assert!(reopened.token().is_none());
    assert!(reopened.user().is_none());
}

#[test]
fn test_empty_token_is_not_logged_in() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = SessionStore::open(dir.path().join("s.json")).unwrap();

    session.store_auth_data("", sample_user()).unwrap();

    assert!(!session.is_logged_in());
}

#[test]
fn test_user_accepts_numeric_id() {
    let user: User = serde_json::from_str(r#"{ "id": 7, "name": "Bob", "email": "bob@example.com" }"#)
        .expect("Failed to parse user");

    assert_eq!(user.id, "7");
    assert!(user.github.is_none());
}

#[test]
fn test_corrupt_session_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(matches!(SessionStore::open(&path), Err(crate::Error::Storage(_))));
}

#[cfg(unix)]
#[test]
fn test_session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let fresh = dir.path().join("session.json");
    let mut session = SessionStore::open(&fresh).unwrap();
    session.store_auth_data("tok", sample_user()).unwrap();

    let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let existing = dir.path().join("existing.json");
    std::fs::write(&existing, "").unwrap();
    std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o644)).unwrap();
    let mut session = SessionStore::open(&existing).unwrap();
    session.store_auth_data("tok", sample_user()).unwrap();

    let mode = std::fs::metadata(&existing).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(SessionStore::open(&existing).unwrap().token(), Some("tok"));
}
