//! Food search and logging.

#[cfg(test)]
#[path = "food_search_test.rs"]
mod food_search_test;

use super::PageError;
use crate::error::{Operation, ValidationError};
use crate::net::api::NutritionApi;
use crate::net::request::RequestConfig;
use crate::net::types::{Food, MealType, NewFoodEntry};
use crate::util::dates::normalize_date;

/// Search the food database. A blank query returns nothing without a call.
///
/// # Errors
///
/// [`PageError::Api`] with `"Failed to search foods"` (or the backend detail).
pub async fn search(api: &dyn NutritionApi, request: &RequestConfig, query: &str) -> Result<Vec<Food>, PageError> {
    let query = query.trim();
    if query.is_empty() {
        tracing::debug!("blank food search; skipping request");
        return Ok(Vec::new());
    }
    let foods = api
        .search_foods(request, query)
        .await
        .map_err(|e| PageError::api(Operation::SearchFoods, e))?;
    tracing::debug!(query, hits = foods.len(), "food search complete");
    Ok(foods)
}

/// Select a search hit by its 1-based position.
///
/// # Errors
///
/// [`PageError::NoSuchFood`] when `position` is 0 or past the end.
pub fn pick(foods: &[Food], position: usize) -> Result<&Food, PageError> {
    position
        .checked_sub(1)
        .and_then(|index| foods.get(index))
        .ok_or(PageError::NoSuchFood { index: position, available: foods.len() })
}

/// Build the log entry for `servings` of `food`, nutrition scaled to match.
///
/// # Errors
///
/// [`PageError::Validation`] when `servings` is not a positive finite number
/// or `date` is malformed.
pub fn build_entry(
    food: &Food,
    meal_type: MealType,
    servings: f64,
    date: Option<&str>,
) -> Result<NewFoodEntry, PageError> {
    if !servings.is_finite() || servings <= 0.0 {
        return Err(ValidationError::NotPositive { field: "servings" }.into());
    }
    let date = normalize_date(date)?;
    let scaled = food.nutrition().scaled(servings);
    Ok(NewFoodEntry {
        user_id: String::new(),
        food_id: food.fdc_id.clone(),
        food_name: food.description.clone(),
        meal_type,
        servings,
        calories: scaled.calories,
        protein: scaled.protein,
        carbs: scaled.carbs,
        fat: scaled.fat,
        date,
    })
}

#[must_use]
pub fn added_notice(food_name: &str, meal_type: MealType) -> String {
    format!("Added {food_name} to {meal_type}!")
}

/// Log `food` and return the success notice.
///
/// # Errors
///
/// Validation as in [`build_entry`]; [`PageError::Api`] with
/// `"Failed to add food"` (or the backend detail).
pub async fn add_food(
    api: &dyn NutritionApi,
    request: &RequestConfig,
    food: &Food,
    meal_type: MealType,
    servings: f64,
    date: Option<&str>,
) -> Result<String, PageError> {
    let entry = build_entry(food, meal_type, servings, date)?;
    let created = api
        .create_food_entry(request, &entry)
        .await
        .map_err(|e| PageError::api(Operation::AddFood, e))?;
    tracing::info!(
        food_id = %entry.food_id,
        meal = %entry.meal_type,
        servings,
        entry_id = created.entry_id.as_deref().unwrap_or("-"),
        "food logged"
    );
    Ok(added_notice(&entry.food_name, entry.meal_type))
}
