//! Profile page: edit the profile and show BMI.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::fmt;

use super::PageError;
use crate::error::{Operation, SessionError, ValidationError};
use crate::net::types::{ActivityLevel, ApiError, Gender, Goal, ProfileUpdate, User};
use crate::state::session::SessionManager;

pub const PROFILE_UPDATED_NOTICE: &str = "Profile updated successfully!";

// =============================================================================
// BMI
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    #[must_use]
    pub fn for_bmi(value: f64) -> Self {
        if value < 18.5 {
            Self::Underweight
        } else if value < 25.0 {
            Self::Normal
        } else if value < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// BMI rounded to one decimal, with the category of the rounded value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}

/// `weight_kg / (height_cm / 100)^2`, or `None` unless both are positive.
#[must_use]
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<BmiReading> {
    let height_cm = height_cm.filter(|h| h.is_finite() && *h > 0.0)?;
    let weight_kg = weight_kg.filter(|w| w.is_finite() && *w > 0.0)?;
    let meters = height_cm / 100.0;
    let value = (weight_kg / (meters * meters) * 10.0).round() / 10.0;
    Some(BmiReading { value, category: BmiCategory::for_bmi(value) })
}

#[must_use]
pub fn user_bmi(user: &User) -> Option<BmiReading> {
    bmi(user.height, user.weight)
}

// =============================================================================
// EDITING
// =============================================================================

/// Fields the user chose to change; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl ProfileChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay these changes on `user`.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] for a blank email or a non-positive age, height,
    /// or weight.
    pub fn apply(&self, user: &User) -> Result<ProfileUpdate, ValidationError> {
        let mut update = ProfileUpdate::from(user);
        if let Some(email) = &self.email {
            let email = email.trim();
            if email.is_empty() {
                return Err(ValidationError::MissingField { field: "email" });
            }
            email.clone_into(&mut update.email);
        }
        if let Some(age) = self.age {
            if age == 0 {
                return Err(ValidationError::NotPositive { field: "age" });
            }
            update.age = Some(age);
        }
        if let Some(height) = self.height {
            update.height = Some(positive(height, "height")?);
        }
        if let Some(weight) = self.weight {
            update.weight = Some(positive(weight, "weight")?);
        }
        if let Some(gender) = self.gender {
            update.gender = Some(gender);
        }
        if let Some(activity_level) = self.activity_level {
            update.activity_level = activity_level;
        }
        if let Some(goal) = self.goal {
            update.goal = goal;
        }
        Ok(update)
    }
}

fn positive(value: f64, field: &'static str) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 { Ok(value) } else { Err(ValidationError::NotPositive { field }) }
}

/// Apply `changes` to the signed-in user's profile and save it.
///
/// # Errors
///
/// [`PageError::Validation`] for bad input; [`PageError::Session`] when no
/// one is signed in or the update is rejected (`"Profile update failed"`
/// unless the backend says more).
pub async fn save(session: &SessionManager, changes: &ProfileChanges) -> Result<&'static str, PageError> {
    let user = session
        .current_user()
        .ok_or_else(|| SessionError::new(Operation::UpdateProfile, ApiError::MissingToken))?;
    let update = changes.apply(&user)?;
    session.update_profile(&update).await?;
    Ok(PROFILE_UPDATED_NOTICE)
}
