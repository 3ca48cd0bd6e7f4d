use std::sync::Arc;

use super::*;
use crate::net::test_helpers::{FakeApi, push, sample_user, status, token};
use crate::util::token_store::{MemoryTokenStore, TokenStore};

#[test]
fn validate_login_input_trims_username() {
    assert_eq!(
        validate_login_input("  alice ", "secret"),
        Ok(("alice".to_owned(), "secret".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "secret"), Err(ValidationError::MissingField { field: "username" }));
    assert_eq!(validate_login_input("alice", ""), Err(ValidationError::MissingField { field: "password" }));
}

#[tokio::test]
async fn submit_signs_in() {
    let api = Arc::new(FakeApi::new());
    push(&api.logins, Ok(token("tok-alice")));
    push(&api.profiles, Ok(sample_user("alice")));
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()), "http://backend.test");

    let user = submit(&session, " alice ", "secret").await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn submit_wrong_password_keeps_session_anonymous() {
    let api = Arc::new(FakeApi::new());
    push(&api.logins, Err(status(401, "Invalid credentials")));
    let store = Arc::new(MemoryTokenStore::new());
    let session = SessionManager::new(api.clone(), store.clone(), "http://backend.test");
    session.initialize().await;

    let err = submit(&session, "alice", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(store.get().unwrap(), None);
    assert_eq!(session.current_user(), None);
}

#[tokio::test]
async fn submit_blank_fields_skip_the_backend() {
    let api = Arc::new(FakeApi::new());
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()), "http://backend.test");
    assert!(submit(&session, "", "").await.is_err());
    assert!(api.call_names().is_empty());
}
