use std::sync::Arc;

use super::*;
use crate::error::{ErrorClass, ErrorCode};
use crate::net::test_helpers::{FakeApi, push, sample_user, status, token};
use crate::util::token_store::MemoryTokenStore;

#[test]
fn bmi_rounds_to_one_decimal() {
    let reading = bmi(Some(180.0), Some(80.0)).unwrap();
    assert!((reading.value - 24.7).abs() < 1e-9);
    assert_eq!(reading.category, BmiCategory::Normal);
    assert_eq!(reading.category.to_string(), "Normal weight");
}

#[test]
fn bmi_needs_positive_height_and_weight() {
    assert_eq!(bmi(None, Some(80.0)), None);
    assert_eq!(bmi(Some(180.0), None), None);
    assert_eq!(bmi(Some(0.0), Some(80.0)), None);
    assert_eq!(bmi(Some(180.0), Some(-5.0)), None);
}

#[test]
fn bmi_category_thresholds() {
    assert_eq!(BmiCategory::for_bmi(18.4), BmiCategory::Underweight);
    assert_eq!(BmiCategory::for_bmi(18.5), BmiCategory::Normal);
    assert_eq!(BmiCategory::for_bmi(24.9), BmiCategory::Normal);
    assert_eq!(BmiCategory::for_bmi(25.0), BmiCategory::Overweight);
    assert_eq!(BmiCategory::for_bmi(29.9), BmiCategory::Overweight);
    assert_eq!(BmiCategory::for_bmi(30.0), BmiCategory::Obese);
}

#[test]
fn category_uses_rounded_value() {
    // 24.96 rounds to 25.0, which is already Overweight.
    let reading = bmi(Some(100.0), Some(24.96)).unwrap();
    assert!((reading.value - 25.0).abs() < 1e-9);
    assert_eq!(reading.category, BmiCategory::Overweight);
}

#[test]
fn user_bmi_reads_profile_fields() {
    let mut user = sample_user("alice");
    assert!(user_bmi(&user).is_some());
    user.height = None;
    assert_eq!(user_bmi(&user), None);
}

#[test]
fn changes_overlay_current_profile() {
    let user = sample_user("alice");
    let changes = ProfileChanges {
        weight: Some(78.5),
        goal: Some(Goal::LoseWeight),
        email: Some(" new@example.com ".to_owned()),
        ..ProfileChanges::default()
    };
    let update = changes.apply(&user).unwrap();
    assert_eq!(update.username, "alice");
    assert_eq!(update.email, "new@example.com");
    assert_eq!(update.weight, Some(78.5));
    assert_eq!(update.height, user.height);
    assert_eq!(update.goal, Goal::LoseWeight);
    assert_eq!(update.activity_level, user.activity_level);
    assert!(!changes.is_empty());
    assert!(ProfileChanges::default().is_empty());
}

#[test]
fn changes_reject_invalid_values() {
    let user = sample_user("alice");
    let bad_height = ProfileChanges { height: Some(-1.0), ..ProfileChanges::default() };
    assert_eq!(bad_height.apply(&user), Err(ValidationError::NotPositive { field: "height" }));

    let bad_age = ProfileChanges { age: Some(0), ..ProfileChanges::default() };
    assert_eq!(bad_age.apply(&user), Err(ValidationError::NotPositive { field: "age" }));

    let blank_email = ProfileChanges { email: Some("  ".to_owned()), ..ProfileChanges::default() };
    assert_eq!(blank_email.apply(&user), Err(ValidationError::MissingField { field: "email" }));
}

async fn signed_in(api: &Arc<FakeApi>) -> SessionManager {
    push(&api.logins, Ok(token("tok-alice")));
    push(&api.profiles, Ok(sample_user("alice")));
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()), "http://backend.test");
    session.login("alice", "secret").await.unwrap();
    session
}

#[tokio::test]
async fn save_updates_and_returns_notice() {
    let api = Arc::new(FakeApi::new());
    let session = signed_in(&api).await;
    let mut refreshed = sample_user("alice");
    refreshed.age = Some(31);
    push(&api.updates, Ok(()));
    push(&api.profiles, Ok(refreshed));

    let changes = ProfileChanges { age: Some(31), ..ProfileChanges::default() };
    assert_eq!(save(&session, &changes).await.unwrap(), "Profile updated successfully!");
    assert_eq!(session.current_user().unwrap().age, Some(31));
}

#[tokio::test]
async fn save_surfaces_backend_detail() {
    let api = Arc::new(FakeApi::new());
    let session = signed_in(&api).await;
    push(&api.updates, Err(status(400, "Email already in use")));

    let changes = ProfileChanges { email: Some("taken@example.com".to_owned()), ..ProfileChanges::default() };
    let err = save(&session, &changes).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already in use");
    assert_eq!(session.current_user().unwrap().email, "alice@example.com");
}

#[tokio::test]
async fn save_requires_sign_in() {
    let api = Arc::new(FakeApi::new());
    let session = SessionManager::new(api.clone(), Arc::new(MemoryTokenStore::new()), "http://backend.test");
    let err = save(&session, &ProfileChanges::default()).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Auth);
    assert_eq!(err.error_code(), "E_MISSING_TOKEN");
    assert!(api.call_names().is_empty());
}
