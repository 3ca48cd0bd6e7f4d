//! Dashboard page: daily nutrition totals against goals.
//!
//! DESIGN
//! ======
//! Percentages are computed from totals and goals; the backend's `progress`
//! block is not read.
//! Goals missing from the response fall back to the backend defaults.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::fmt;

use super::PageError;
use crate::error::Operation;
use crate::net::api::NutritionApi;
use crate::net::request::RequestConfig;
use crate::net::types::{Dashboard, WeightEntry};
use crate::util::dates::normalize_date;

/// Color band for a progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Moderate,
    Near,
    Over,
}

impl ProgressBand {
    #[must_use]
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Over
        } else if percentage >= 80.0 {
            Self::Near
        } else if percentage >= 60.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Near => "near",
            Self::Over => "over",
        }
    }
}

impl fmt::Display for ProgressBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `current / goal * 100`, or 0 when the goal is not positive.
#[must_use]
pub fn percentage(current: f64, goal: f64) -> f64 {
    if goal > 0.0 { current / goal * 100.0 } else { 0.0 }
}

/// One nutrient's card.
#[derive(Clone, Debug, PartialEq)]
pub struct NutrientProgress {
    pub label: &'static str,
    pub unit: &'static str,
    pub current: f64,
    pub goal: f64,
}

impl NutrientProgress {
    #[must_use]
    pub fn new(label: &'static str, unit: &'static str, current: f64, goal: f64) -> Self {
        Self { label, unit, current, goal }
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.current, self.goal)
    }

    /// Bar fill, clamped to 0..=100.
    #[must_use]
    pub fn bar_width(&self) -> f64 {
        self.percentage().clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn band(&self) -> ProgressBand {
        ProgressBand::for_percentage(self.percentage())
    }

    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.goal - self.current).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub date: String,
    pub calories: NutrientProgress,
    pub protein: NutrientProgress,
    pub carbs: NutrientProgress,
    pub fat: NutrientProgress,
    pub entries_count: u32,
    pub latest_weight: Option<WeightEntry>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_dashboard(date: impl Into<String>, dashboard: &Dashboard) -> Self {
        let totals = dashboard.total_nutrition;
        let goals = dashboard.user_goals;
        Self {
            date: date.into(),
            calories: NutrientProgress::new("Calories", "kcal", totals.calories, goals.calories()),
            protein: NutrientProgress::new("Protein", "g", totals.protein, goals.protein()),
            carbs: NutrientProgress::new("Carbs", "g", totals.carbs, goals.carbs()),
            fat: NutrientProgress::new("Fat", "g", totals.fat, goals.fat()),
            entries_count: dashboard.entries_count,
            latest_weight: dashboard.latest_weight.clone(),
        }
    }

    #[must_use]
    pub fn calories_remaining(&self) -> f64 {
        self.calories.remaining()
    }

    #[must_use]
    pub fn nutrients(&self) -> [&NutrientProgress; 4] {
        [&self.calories, &self.protein, &self.carbs, &self.fat]
    }

    #[must_use]
    pub fn has_entries(&self) -> bool {
        self.entries_count > 0
    }
}

/// Load the dashboard for `date` (today when absent).
///
/// # Errors
///
/// [`PageError::Validation`] for a malformed date; [`PageError::Api`] with
/// `"Failed to load dashboard data"` (or the backend detail) otherwise.
pub async fn load_dashboard(
    api: &dyn NutritionApi,
    request: &RequestConfig,
    date: Option<&str>,
) -> Result<DashboardSummary, PageError> {
    let date = normalize_date(date)?;
    let dashboard = api
        .fetch_dashboard(request, &date)
        .await
        .map_err(|e| PageError::api(Operation::LoadDashboard, e))?;
    tracing::debug!(%date, entries = dashboard.entries_count, "dashboard loaded");
    Ok(DashboardSummary::from_dashboard(date, &dashboard))
}
