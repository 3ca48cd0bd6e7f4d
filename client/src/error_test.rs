use super::*;

#[test]
fn user_message_prefers_backend_detail() {
    let err = ApiError::Status { status: 401, detail: Some("Invalid credentials".to_owned()) };
    assert_eq!(Operation::Login.user_message(&err), "Invalid credentials");
}

#[test]
fn user_message_falls_back_per_operation() {
    let err = ApiError::Request("connection refused".to_owned());
    assert_eq!(Operation::Login.user_message(&err), "Login failed");
    assert_eq!(Operation::Register.user_message(&err), "Registration failed");
    assert_eq!(Operation::UpdateProfile.user_message(&err), "Profile update failed");
    assert_eq!(Operation::SearchFoods.user_message(&err), "Failed to search foods");
    assert_eq!(Operation::AddWeightEntry.user_message(&err), "Failed to add weight entry");
}

#[test]
fn status_without_detail_uses_fallback() {
    let err = ApiError::Status { status: 500, detail: None };
    assert_eq!(Operation::LoadDashboard.user_message(&err), "Failed to load dashboard data");
}

#[test]
fn session_error_displays_message_and_keeps_source() {
    let err = SessionError::new(
        Operation::Login,
        ApiError::Status { status: 401, detail: Some("Invalid credentials".to_owned()) },
    );
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.class(), ErrorClass::Auth);
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn session_error_can_be_reattributed() {
    let err = SessionError::new(Operation::RefreshProfile, ApiError::Request("reset".to_owned()));
    assert_eq!(err.message, "Failed to load profile");
    let err = err.for_operation(Operation::Register);
    assert_eq!(err.operation, Operation::Register);
    assert_eq!(err.message, "Registration failed");
}

#[test]
fn validation_errors_are_validation_class() {
    assert_eq!(ValidationError::PasswordMismatch.to_string(), "Passwords do not match");
    assert_eq!(ValidationError::MissingWeightOrDate.to_string(), "Please enter both weight and date");
    assert_eq!(ValidationError::NotPositive { field: "servings" }.class(), ErrorClass::Validation);
    assert_eq!(ValidationError::InvalidDate("2024-13-01".to_owned()).error_code(), "E_INVALID_DATE");
}
