//! Registration page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::fmt;

use super::PageError;
use crate::error::ValidationError;
use crate::net::types::{ActivityLevel, Gender, Goal, Registration, User};
use crate::state::session::SessionManager;

pub const WELCOME_NOTICE: &str = "Welcome to FitTracker!";

/// Raw sign-up form. Optional profile fields stay `None` when left blank.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .field("height", &self.height)
            .field("weight", &self.weight)
            .field("activity_level", &self.activity_level)
            .field("goal", &self.goal)
            .finish()
    }
}

impl RegistrationForm {
    /// Validate the form and build the request payload.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] for a blank username, email, or
    /// password; [`ValidationError::PasswordMismatch`] when the confirmation
    /// differs; [`ValidationError::NotPositive`] for a zero age or a
    /// non-positive height or weight.
    pub fn to_registration(&self) -> Result<Registration, ValidationError> {
        let username = required(&self.username, "username")?;
        let email = required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.age == Some(0) {
            return Err(ValidationError::NotPositive { field: "age" });
        }
        for (value, field) in [(self.height, "height"), (self.weight, "weight")] {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                return Err(ValidationError::NotPositive { field });
            }
        }

        Ok(Registration {
            username,
            email,
            password: self.password.clone(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            activity_level: self.activity_level,
            goal: self.goal,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() { Err(ValidationError::MissingField { field }) } else { Ok(trimmed.to_owned()) }
}

/// Validate, register, and sign in.
///
/// # Errors
///
/// [`PageError::Validation`] before any request; [`PageError::Session`]
/// with the backend detail (or `"Registration failed"`).
pub async fn submit(session: &SessionManager, form: &RegistrationForm) -> Result<User, PageError> {
    let registration = form.to_registration()?;
    Ok(session.register(&registration).await?)
}
