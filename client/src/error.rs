//! Shared error classification and user-facing failure messages.
//!
//! DESIGN
//! ======
//! Each layer owns its own `thiserror` enum. They all implement
//! [`ErrorCode`] so front ends can branch on a stable code and on the
//! coarse [`ErrorClass`] (e.g. force a logout on `Auth`) without matching
//! on every concrete variant.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::types::ApiError;

/// Coarse failure taxonomy shared by every error type in the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected locally before any network call.
    Validation,
    /// Missing, expired, or rejected credentials.
    Auth,
    /// Network or server trouble; the user may simply try again.
    Transient,
    /// Request short-circuited because it cannot be meaningful.
    Domain,
}

/// Stable machine-readable code plus classification.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    fn class(&self) -> ErrorClass;
}

/// User-initiated operations, used to pick a fallback message when the
/// backend does not supply one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    RefreshProfile,
    UpdateProfile,
    LoadDashboard,
    SearchFoods,
    AddFood,
    LoadWeightEntries,
    AddWeightEntry,
}

impl Operation {
    /// Generic phrase shown when the backend payload carries no detail.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::RefreshProfile => "Failed to load profile",
            Self::UpdateProfile => "Profile update failed",
            Self::LoadDashboard => "Failed to load dashboard data",
            Self::SearchFoods => "Failed to search foods",
            Self::AddFood => "Failed to add food",
            Self::LoadWeightEntries => "Failed to load weight entries",
            Self::AddWeightEntry => "Failed to add weight entry",
        }
    }

    /// Best-effort message for `error`: the backend `detail` when present,
    /// otherwise this operation's fallback phrase.
    #[must_use]
    pub fn user_message(self, error: &ApiError) -> String {
        error
            .detail()
            .map_or_else(|| self.fallback_message().to_owned(), ToOwned::to_owned)
    }
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter both weight and date")]
    MissingWeightOrDate,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PasswordMismatch => "E_PASSWORD_MISMATCH",
            Self::MissingWeightOrDate => "E_MISSING_WEIGHT_OR_DATE",
            Self::MissingField { .. } => "E_MISSING_FIELD",
            Self::NotPositive { .. } => "E_NOT_POSITIVE",
            Self::InvalidDate(_) => "E_INVALID_DATE",
        }
    }

    fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}

/// Failure result of an explicit session operation.
///
/// `message` is what a notice should display; `source` keeps the
/// underlying API error for diagnostics and classification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SessionError {
    pub operation: Operation,
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl SessionError {
    #[must_use]
    pub fn new(operation: Operation, source: ApiError) -> Self {
        let message = operation.user_message(&source);
        Self { operation, message, source }
    }

    /// Re-attribute a failure to the operation the caller actually invoked.
    #[must_use]
    pub fn for_operation(self, operation: Operation) -> Self {
        Self::new(operation, self.source)
    }
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        self.source.error_code()
    }

    fn class(&self) -> ErrorClass {
        self.source.class()
    }
}
