//! Scripted [`NutritionApi`] double and fixtures shared by unit tests.

use std::sync::Mutex;

use tokio::sync::oneshot;

use super::api::NutritionApi;
use super::request::RequestConfig;
use super::types::{
    ActivityLevel, ApiError, Created, Credentials, Dashboard, Food, Goal, NewFoodEntry, NewWeightEntry,
    ProfileUpdate, Registration, TokenResponse, User, WeightEntry,
};

type Script<T> = Mutex<Vec<Result<T, ApiError>>>;

/// Each endpoint pops the next scripted result in order. Unscripted calls
/// fail with a transient request error. Every call records the bearer it
/// was made with.
#[derive(Default)]
pub struct FakeApi {
    pub logins: Script<TokenResponse>,
    pub registrations: Script<TokenResponse>,
    pub profiles: Script<User>,
    pub updates: Script<()>,
    pub dashboards: Script<Dashboard>,
    pub searches: Script<Vec<Food>>,
    pub food_entries: Script<Created>,
    pub weight_lists: Script<Vec<WeightEntry>>,
    pub weight_entries: Script<Created>,

    /// When set, the next profile fetch waits for this signal.
    pub profile_gate: Mutex<Option<oneshot::Receiver<()>>>,

    pub calls: Mutex<Vec<(&'static str, Option<String>)>>,
    pub sent_registrations: Mutex<Vec<Registration>>,
    pub sent_updates: Mutex<Vec<ProfileUpdate>>,
    pub sent_dates: Mutex<Vec<String>>,
    pub sent_queries: Mutex<Vec<String>>,
    pub sent_food_entries: Mutex<Vec<NewFoodEntry>>,
    pub sent_weight_entries: Mutex<Vec<NewWeightEntry>>,
}

pub fn push<T>(script: &Script<T>, result: Result<T, ApiError>) {
    script.lock().unwrap().push(result);
}

pub fn token(value: &str) -> TokenResponse {
    TokenResponse { access_token: value.to_owned(), token_type: Some("bearer".to_owned()) }
}

pub fn status(code: u16, detail: &str) -> ApiError {
    ApiError::Status { status: code, detail: Some(detail.to_owned()) }
}

pub fn sample_user(username: &str) -> User {
    User {
        user_id: format!("id-{username}"),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        age: Some(30),
        gender: None,
        height: Some(180.0),
        weight: Some(80.0),
        activity_level: ActivityLevel::ModeratelyActive,
        goal: Goal::Maintain,
        daily_calorie_goal: Some(2500.0),
        daily_protein_goal: Some(187.5),
        daily_carb_goal: Some(281.3),
        daily_fat_goal: Some(83.3),
    }
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().iter().map(|(_, bearer)| bearer.clone()).collect()
    }

    fn record(&self, name: &'static str, request: &RequestConfig) {
        self.calls.lock().unwrap().push((name, request.bearer().map(ToOwned::to_owned)));
    }
}

fn next<T>(script: &Script<T>, name: &str) -> Result<T, ApiError> {
    let mut queue = script.lock().unwrap();
    if queue.is_empty() {
        return Err(ApiError::Request(format!("unscripted call to {name}")));
    }
    queue.remove(0)
}

#[async_trait::async_trait]
impl NutritionApi for FakeApi {
    async fn login(&self, request: &RequestConfig, _credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.record("login", request);
        next(&self.logins, "login")
    }

    async fn register(
        &self,
        request: &RequestConfig,
        registration: &Registration,
    ) -> Result<TokenResponse, ApiError> {
        self.record("register", request);
        self.sent_registrations.lock().unwrap().push(registration.clone());
        next(&self.registrations, "register")
    }

    async fn fetch_profile(&self, request: &RequestConfig) -> Result<User, ApiError> {
        self.record("fetch_profile", request);
        let gate = self.profile_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        next(&self.profiles, "fetch_profile")
    }

    async fn update_profile(&self, request: &RequestConfig, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.record("update_profile", request);
        self.sent_updates.lock().unwrap().push(update.clone());
        next(&self.updates, "update_profile")
    }

    async fn fetch_dashboard(&self, request: &RequestConfig, date: &str) -> Result<Dashboard, ApiError> {
        self.record("fetch_dashboard", request);
        self.sent_dates.lock().unwrap().push(date.to_owned());
        next(&self.dashboards, "fetch_dashboard")
    }

    async fn search_foods(&self, request: &RequestConfig, query: &str) -> Result<Vec<Food>, ApiError> {
        self.record("search_foods", request);
        self.sent_queries.lock().unwrap().push(query.to_owned());
        next(&self.searches, "search_foods")
    }

    async fn create_food_entry(&self, request: &RequestConfig, entry: &NewFoodEntry) -> Result<Created, ApiError> {
        self.record("create_food_entry", request);
        self.sent_food_entries.lock().unwrap().push(entry.clone());
        next(&self.food_entries, "create_food_entry")
    }

    async fn list_weight_entries(&self, request: &RequestConfig) -> Result<Vec<WeightEntry>, ApiError> {
        self.record("list_weight_entries", request);
        next(&self.weight_lists, "list_weight_entries")
    }

    async fn create_weight_entry(
        &self,
        request: &RequestConfig,
        entry: &NewWeightEntry,
    ) -> Result<Created, ApiError> {
        self.record("create_weight_entry", request);
        self.sent_weight_entries.lock().unwrap().push(entry.clone());
        next(&self.weight_entries, "create_weight_entry")
    }
}
