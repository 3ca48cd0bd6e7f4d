//! Login page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::PageError;
use crate::error::ValidationError;
use crate::net::types::User;
use crate::state::session::SessionManager;

/// Trim the username and require both fields.
///
/// # Errors
///
/// [`ValidationError::MissingField`] for a blank username or password.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::MissingField { field: "username" });
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField { field: "password" });
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// # Errors
///
/// [`PageError::Validation`] before any request; [`PageError::Session`]
/// with the backend detail (or `"Login failed"`).
pub async fn submit(session: &SessionManager, username: &str, password: &str) -> Result<User, PageError> {
    let (username, password) = validate_login_input(username, password)?;
    Ok(session.login(&username, &password).await?)
}
