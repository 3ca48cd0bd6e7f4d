//! Non-visual logic behind each screen.
//!
//! ARCHITECTURE
//! ============
//! Each page owns screen-scoped orchestration: validate input, call the API
//! with the [`RequestConfig`](crate::net::request::RequestConfig) the session
//! hands out, and shape the result for display. Rendering belongs to the
//! front end (the CLI in this workspace).


pub mod dashboard;
pub mod food_search;
pub mod login;
pub mod profile;
pub mod register;
pub mod weight;

use crate::error::{ErrorClass, ErrorCode, Operation, SessionError, ValidationError};
use crate::net::types::ApiError;

/// Failure of a page action, ready to show as a notice via `Display`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{message}")]
    Api {
        operation: Operation,
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("No food at position {index} (search returned {available})")]
    NoSuchFood { index: usize, available: usize },
}

impl PageError {
    /// Wrap an API failure, preferring the backend detail for the message.
    #[must_use]
    pub fn api(operation: Operation, source: ApiError) -> Self {
        tracing::warn!(?operation, code = source.error_code(), error = %source, "page request failed");
        let message = operation.user_message(&source);
        Self::Api { operation, message, source }
    }
}

impl ErrorCode for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Api { source, .. } => source.error_code(),
            Self::NoSuchFood { .. } => "E_NO_SUCH_FOOD",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(e) => e.class(),
            Self::Session(e) => e.class(),
            Self::Api { source, .. } => source.class(),
            Self::NoSuchFood { .. } => ErrorClass::Domain,
        }
    }
}
