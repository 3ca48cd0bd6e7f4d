//! Explicit per-call request configuration.
//!
//! DESIGN
//! ======
//! There is no process-wide default `Authorization` header. The session
//! manager hands out a `RequestConfig` snapshot and every API call takes one,
//! so which credential a request carries is visible at the call site.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::fmt;

/// Base URL plus the optional bearer credential for one or more calls.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestConfig {
    base_url: String,
    bearer: Option<String>,
}

impl RequestConfig {
    /// Anonymous configuration for `base_url` (trailing slashes dropped).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), bearer: None }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_optional_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.bearer.is_some()
    }

    /// Absolute URL for an API path such as `/api/profile`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `Authorization` header value, if a bearer token is attached.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_deref().map(|token| format!("Bearer {token}"))
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("base_url", &self.base_url)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
