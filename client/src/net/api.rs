//! REST API client for the FitTrack backend.
//!
//! The [`NutritionApi`] trait is the seam the session manager and pages
//! depend on; [`HttpApi`] is the reqwest-backed implementation. Every call
//! takes an explicit [`RequestConfig`] carrying the base URL and optional
//! bearer token.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] with the backend's `detail`
//! message when one can be extracted. Authorized endpoints refuse to send a
//! request without a bearer token. Nothing is retried here.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::request::RequestConfig;
use super::types::{
    ApiError, Created, Credentials, Dashboard, Food, FoodSearchResponse, NewFoodEntry, NewWeightEntry,
    ProfileUpdate, Registration, TokenResponse, User, WeightEntriesResponse, WeightEntry,
};
use crate::config::Timeouts;

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";
pub const PROFILE_PATH: &str = "/api/profile";
pub const DASHBOARD_PATH: &str = "/api/dashboard";
pub const FOOD_SEARCH_PATH: &str = "/api/foods/search";
pub const FOOD_ENTRIES_PATH: &str = "/api/food-entries";
pub const WEIGHT_ENTRIES_PATH: &str = "/api/weight-entries";

// =============================================================================
// TRAIT
// =============================================================================

/// One method per backend endpoint.
#[async_trait::async_trait]
pub trait NutritionApi: Send + Sync {
    /// `POST /api/login`.
    async fn login(&self, request: &RequestConfig, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// `POST /api/register`.
    async fn register(&self, request: &RequestConfig, registration: &Registration)
    -> Result<TokenResponse, ApiError>;

    /// `GET /api/profile` (bearer).
    async fn fetch_profile(&self, request: &RequestConfig) -> Result<User, ApiError>;

    /// `PUT /api/profile` (bearer).
    async fn update_profile(&self, request: &RequestConfig, update: &ProfileUpdate) -> Result<(), ApiError>;

    /// `GET /api/dashboard?date=YYYY-MM-DD` (bearer).
    async fn fetch_dashboard(&self, request: &RequestConfig, date: &str) -> Result<Dashboard, ApiError>;

    /// `GET /api/foods/search?query=…` (bearer).
    async fn search_foods(&self, request: &RequestConfig, query: &str) -> Result<Vec<Food>, ApiError>;

    /// `POST /api/food-entries` (bearer).
    async fn create_food_entry(&self, request: &RequestConfig, entry: &NewFoodEntry) -> Result<Created, ApiError>;

    /// `GET /api/weight-entries` (bearer), most recent first.
    async fn list_weight_entries(&self, request: &RequestConfig) -> Result<Vec<WeightEntry>, ApiError>;

    /// `POST /api/weight-entries` (bearer).
    async fn create_weight_entry(&self, request: &RequestConfig, entry: &NewWeightEntry)
    -> Result<Created, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// reqwest-backed [`NutritionApi`].
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
}

impl HttpApi {
    /// Build a client with the given request/connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if reqwest cannot build the client.
    pub fn new(timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    fn anonymous(&self, request: &RequestConfig, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, request.url(path))
    }

    fn authorized(&self, request: &RequestConfig, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let header = request.authorization().ok_or(ApiError::MissingToken)?;
        Ok(self.anonymous(request, method, path).header(AUTHORIZATION, header))
    }
}

/// Send `builder` and return the response body, mapping failures.
async fn execute(builder: RequestBuilder) -> Result<String, ApiError> {
    let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
    let status = response.status();
    let url = response.url().path().to_owned();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), path = %url, "API request rejected");
        return Err(ApiError::Status { status: status.as_u16(), detail: extract_detail(&text) });
    }
    Ok(text)
}

async fn fetch_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let text = execute(builder).await?;
    parse_body(&text)
}

async fn fetch_created(builder: RequestBuilder) -> Result<Created, ApiError> {
    let text = execute(builder).await?;
    if text.trim().is_empty() {
        return Ok(Created::default());
    }
    parse_body(&text)
}

#[async_trait::async_trait]
impl NutritionApi for HttpApi {
    async fn login(&self, request: &RequestConfig, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        fetch_json(self.anonymous(request, Method::POST, LOGIN_PATH).json(credentials)).await
    }

    async fn register(
        &self,
        request: &RequestConfig,
        registration: &Registration,
    ) -> Result<TokenResponse, ApiError> {
        fetch_json(self.anonymous(request, Method::POST, REGISTER_PATH).json(registration)).await
    }

    async fn fetch_profile(&self, request: &RequestConfig) -> Result<User, ApiError> {
        fetch_json(self.authorized(request, Method::GET, PROFILE_PATH)?).await
    }

    async fn update_profile(&self, request: &RequestConfig, update: &ProfileUpdate) -> Result<(), ApiError> {
        execute(self.authorized(request, Method::PUT, PROFILE_PATH)?.json(update)).await?;
        Ok(())
    }

    async fn fetch_dashboard(&self, request: &RequestConfig, date: &str) -> Result<Dashboard, ApiError> {
        let builder = self.authorized(request, Method::GET, DASHBOARD_PATH)?.query(&[("date", date)]);
        fetch_json(builder).await
    }

    async fn search_foods(&self, request: &RequestConfig, query: &str) -> Result<Vec<Food>, ApiError> {
        let builder = self.authorized(request, Method::GET, FOOD_SEARCH_PATH)?.query(&[("query", query)]);
        let body: FoodSearchResponse = fetch_json(builder).await?;
        Ok(body.foods)
    }

    async fn create_food_entry(&self, request: &RequestConfig, entry: &NewFoodEntry) -> Result<Created, ApiError> {
        fetch_created(self.authorized(request, Method::POST, FOOD_ENTRIES_PATH)?.json(entry)).await
    }

    async fn list_weight_entries(&self, request: &RequestConfig) -> Result<Vec<WeightEntry>, ApiError> {
        let body: WeightEntriesResponse = fetch_json(self.authorized(request, Method::GET, WEIGHT_ENTRIES_PATH)?).await?;
        Ok(body.entries)
    }

    async fn create_weight_entry(
        &self,
        request: &RequestConfig,
        entry: &NewWeightEntry,
    ) -> Result<Created, ApiError> {
        fetch_created(self.authorized(request, Method::POST, WEIGHT_ENTRIES_PATH)?.json(entry)).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "…"}` and the validation form
/// `{"detail": [{"msg": "…", …}, …]}` (first message wins).
#[must_use]
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(ToOwned::to_owned),
        _ => None,
    }
}
