//! Wire-schema DTOs for the FitTrack REST API, plus the API error type.
//!
//! DESIGN
//! ======
//! Response types are lenient: the backend omits fields, sends `null` where
//! a default is implied, and emits ids as either numbers or strings. Custom
//! deserializers normalize those shapes here so the rest of the crate can
//! work with plain Rust values.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ErrorClass, ErrorCode};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by REST API calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// An authorized endpoint was called without a bearer token.
    #[error("not authenticated: no bearer token")]
    MissingToken,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16, detail: Option<String> },

    /// A success response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Human-readable message supplied by the backend, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code for backend rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "E_MISSING_TOKEN",
            Self::Request(_) => "E_API_REQUEST",
            Self::Status { status: 401 | 403, .. } => "E_UNAUTHORIZED",
            Self::Status { .. } => "E_API_STATUS",
            Self::Parse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::MissingToken | Self::Status { status: 401 | 403, .. } => ErrorClass::Auth,
            _ => ErrorClass::Transient,
        }
    }
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// A string did not name any variant of a wire enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire spelling of this variant.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                        expected: Self::ALL
                            .iter()
                            .map(|variant| variant.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Self-reported activity level, used by the backend to derive goals.
    ActivityLevel, "activity level" {
        Sedentary => "sedentary",
        LightlyActive => "lightly_active",
        ModeratelyActive => "moderately_active",
        VeryActive => "very_active",
        ExtraActive => "extra_active",
    }
}

wire_enum! {
    /// Weight goal, used by the backend to offset the calorie target.
    Goal, "goal" {
        LoseWeight => "lose_weight",
        Maintain => "maintain",
        GainWeight => "gain_weight",
    }
}

wire_enum! {
    Gender, "gender" {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

wire_enum! {
    /// Meal bucket a food entry is logged under.
    MealType, "meal type" {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
}

impl Default for ActivityLevel {
    fn default() -> Self {
        Self::Sedentary
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self::Maintain
    }
}

impl Default for MealType {
    fn default() -> Self {
        Self::Breakfast
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// `POST /api/login` body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/register` body. Optional profile fields serialize as `null`.
#[derive(Clone, PartialEq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .field("height", &self.height)
            .field("weight", &self.weight)
            .field("activity_level", &self.activity_level)
            .field("goal", &self.goal)
            .finish()
    }
}

/// Token issued by login and registration.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// The authenticated user's profile as returned by `GET /api/profile`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_gender")]
    pub gender: Option<Gender>,
    /// Height in centimetres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub activity_level: ActivityLevel,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub goal: Goal,
    /// Backend-derived daily targets; absent until the profile is complete.
    #[serde(default)]
    pub daily_calorie_goal: Option<f64>,
    #[serde(default)]
    pub daily_protein_goal: Option<f64>,
    #[serde(default)]
    pub daily_carb_goal: Option<f64>,
    #[serde(default)]
    pub daily_fat_goal: Option<f64>,
}

/// `PUT /api/profile` body. The backend validates it as a full profile, so
/// identity fields travel with every update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            age: user.age,
            gender: user.gender,
            height: user.height,
            weight: user.weight,
            activity_level: user.activity_level,
            goal: user.goal,
        }
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GOAL: f64 = 150.0;
pub const DEFAULT_CARB_GOAL: f64 = 250.0;
pub const DEFAULT_FAT_GOAL: f64 = 67.0;

/// Calories (kcal) and macronutrients (grams).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionTotals {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub calories: f64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub protein: f64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub carbs: f64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub fat: f64,
}

impl NutritionTotals {
    /// Every figure multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

/// Daily targets as reported on the dashboard. Missing values fall back to
/// the backend's defaults through the accessor methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionGoals {
    pub daily_calorie_goal: Option<f64>,
    pub daily_protein_goal: Option<f64>,
    pub daily_carb_goal: Option<f64>,
    pub daily_fat_goal: Option<f64>,
}

impl NutritionGoals {
    #[must_use]
    pub fn calories(&self) -> f64 {
        self.daily_calorie_goal.unwrap_or(DEFAULT_CALORIE_GOAL)
    }

    #[must_use]
    pub fn protein(&self) -> f64 {
        self.daily_protein_goal.unwrap_or(DEFAULT_PROTEIN_GOAL)
    }

    #[must_use]
    pub fn carbs(&self) -> f64 {
        self.daily_carb_goal.unwrap_or(DEFAULT_CARB_GOAL)
    }

    #[must_use]
    pub fn fat(&self) -> f64 {
        self.daily_fat_goal.unwrap_or(DEFAULT_FAT_GOAL)
    }
}

/// `GET /api/dashboard?date=…` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub total_nutrition: NutritionTotals,
    pub user_goals: NutritionGoals,
    pub entries_count: u32,
    pub latest_weight: Option<WeightEntry>,
}

// =============================================================================
// FOODS
// =============================================================================

/// One food search hit. Nutrition figures are per serving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(deserialize_with = "deserialize_string_from_scalar")]
    pub fdc_id: String,
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub brand_name: Option<String>,
    #[serde(default = "default_serving_size", deserialize_with = "deserialize_serving_size")]
    pub serving_size: f64,
    #[serde(default = "default_serving_unit", deserialize_with = "deserialize_serving_unit")]
    pub serving_unit: String,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub calories: f64,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub protein: f64,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub fat: f64,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
}

impl Food {
    /// Calories and macronutrients for a single serving.
    #[must_use]
    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals { calories: self.calories, protein: self.protein, carbs: self.carbs, fat: self.fat }
    }
}

fn default_serving_size() -> f64 {
    100.0
}

fn default_serving_unit() -> String {
    "g".to_owned()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FoodSearchResponse {
    #[serde(default)]
    pub foods: Vec<Food>,
}

/// `POST /api/food-entries` body. Nutrition is already scaled by `servings`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewFoodEntry {
    /// Required by the backend schema but overwritten from the bearer token;
    /// always sent empty.
    pub user_id: String,
    pub food_id: String,
    pub food_name: String,
    pub meal_type: MealType,
    pub servings: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Acknowledgement returned by the create endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Created {
    pub message: Option<String>,
    pub entry_id: Option<String>,
}

// =============================================================================
// WEIGHT
// =============================================================================

/// A logged body-weight reading in kilograms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    #[serde(default)]
    pub entry_id: String,
    pub weight: f64,
    /// `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WeightEntriesResponse {
    #[serde(default)]
    pub entries: Vec<WeightEntry>,
}

/// `POST /api/weight-entries` body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewWeightEntry {
    /// Sent empty; the backend fills it from the bearer token.
    pub user_id: String,
    pub weight: f64,
    pub date: String,
}

// =============================================================================
// DESERIALIZERS
// =============================================================================

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_serving_size<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_serving_size))
}

fn deserialize_serving_unit<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_blank_as_none(deserializer)?.unwrap_or_else(default_serving_unit))
}

fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn deserialize_optional_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let Some(raw) = deserialize_blank_as_none(deserializer)? else {
        return Ok(None);
    };
    raw.to_ascii_lowercase()
        .parse::<Gender>()
        .map(Some)
        .map_err(D::Error::custom)
}

fn deserialize_string_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
