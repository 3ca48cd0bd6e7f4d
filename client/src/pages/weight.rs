//! Weight tracking page.
//!
//! Entries arrive most recent first; change and trend compare the two
//! newest readings.

#[cfg(test)]
#[path = "weight_test.rs"]
mod weight_test;

use std::fmt;

use super::PageError;
use crate::error::{Operation, ValidationError};
use crate::net::api::NutritionApi;
use crate::net::request::RequestConfig;
use crate::net::types::{NewWeightEntry, WeightEntry};
use crate::util::dates::{format_iso_date, parse_iso_date};

pub const WEIGHT_LOGGED_NOTICE: &str = "Weight logged successfully!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightTrend {
    Up,
    Down,
    Stable,
}

impl WeightTrend {
    #[must_use]
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for WeightTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `latest - previous` for the two newest entries.
#[must_use]
pub fn weight_change(entries: &[WeightEntry]) -> Option<f64> {
    match entries {
        [latest, previous, ..] => Some(latest.weight - previous.weight),
        _ => None,
    }
}

/// Signed change with one decimal, e.g. `+0.4 kg`.
#[must_use]
pub fn format_change(change: f64) -> String {
    format!("{change:+.1} kg")
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightHistory {
    pub entries: Vec<WeightEntry>,
}

impl WeightHistory {
    #[must_use]
    pub fn latest(&self) -> Option<&WeightEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn change(&self) -> Option<f64> {
        weight_change(&self.entries)
    }

    #[must_use]
    pub fn trend(&self) -> Option<WeightTrend> {
        self.change().map(WeightTrend::from_change)
    }
}

/// # Errors
///
/// [`PageError::Api`] with `"Failed to load weight entries"` (or the
/// backend detail).
pub async fn load_history(api: &dyn NutritionApi, request: &RequestConfig) -> Result<WeightHistory, PageError> {
    let entries = api
        .list_weight_entries(request)
        .await
        .map_err(|e| PageError::api(Operation::LoadWeightEntries, e))?;
    Ok(WeightHistory { entries })
}

/// Check form input before any request.
///
/// # Errors
///
/// [`ValidationError::MissingWeightOrDate`] when either is absent,
/// [`ValidationError::NotPositive`] for a non-positive weight, and
/// [`ValidationError::InvalidDate`] for a malformed date.
pub fn validate_new_entry(weight: Option<f64>, date: Option<&str>) -> Result<NewWeightEntry, ValidationError> {
    let date = date.map(str::trim).filter(|d| !d.is_empty());
    let (Some(weight), Some(date)) = (weight, date) else {
        return Err(ValidationError::MissingWeightOrDate);
    };
    if !weight.is_finite() || weight <= 0.0 {
        return Err(ValidationError::NotPositive { field: "weight" });
    }
    let date = format_iso_date(parse_iso_date(date)?);
    Ok(NewWeightEntry { user_id: String::new(), weight, date })
}

/// Log a reading and return the success notice.
///
/// # Errors
///
/// Validation as in [`validate_new_entry`]; [`PageError::Api`] with
/// `"Failed to add weight entry"` (or the backend detail).
pub async fn log_weight(
    api: &dyn NutritionApi,
    request: &RequestConfig,
    weight: Option<f64>,
    date: Option<&str>,
) -> Result<&'static str, PageError> {
    let entry = validate_new_entry(weight, date)?;
    api.create_weight_entry(request, &entry)
        .await
        .map_err(|e| PageError::api(Operation::AddWeightEntry, e))?;
    tracing::info!(weight = entry.weight, date = %entry.date, "weight logged");
    Ok(WEIGHT_LOGGED_NOTICE)
}
