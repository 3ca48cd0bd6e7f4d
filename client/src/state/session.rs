//! Session manager: the single owner of "who is logged in".
//!
//! DESIGN
//! ======
//! The manager holds the API client, the injected token store, and a
//! `tokio::sync::watch` sender carrying the current [`AuthState`]. Consumers
//! call [`SessionManager::subscribe`] and re-render on change. Pages never
//! read the token store; they ask for a [`RequestConfig`] snapshot and pass
//! it into every API call.
//!
//! ```text
//! Unresolved --no token--> Anonymous
//! Unresolved --token-----> Resolving --profile ok--> Authenticated
//!                                    \--profile err-> Anonymous (token purged)
//! Anonymous --login/register--> Resolving
//! Authenticated --logout / refresh failure--> Anonymous
//! ```
//!
//! Profile responses are applied only while the token they were fetched
//! with is still current, so a late response after logout (or after a newer
//! login) is dropped instead of resurrecting the old session.
//!
//! ERROR HANDLING
//! ==============
//! Explicit operations (`login`, `register`, `update_profile`) return a
//! [`SessionError`] with a display-ready message. Passive profile refreshes
//! that fail force a logout. Token-store failures are logged, never
//! propagated. Token values are never logged.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;

use super::auth::{AuthState, SessionPhase};
use crate::config::ClientConfig;
use crate::error::{ErrorCode, Operation, SessionError};
use crate::net::api::{HttpApi, NutritionApi};
use crate::net::request::RequestConfig;
use crate::net::types::{ApiError, Credentials, ProfileUpdate, Registration, User};
use crate::util::token_store::{FileTokenStore, TokenStore};

pub struct SessionManager {
    api: Arc<dyn NutritionApi>,
    store: Arc<dyn TokenStore>,
    base_url: String,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<dyn NutritionApi>, store: Arc<dyn TokenStore>, base_url: &str) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { api, store, base_url: base_url.trim_end_matches('/').to_owned(), state }
    }

    /// Wire the reqwest client and the file-backed token store from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = HttpApi::new(config.timeouts)?;
        let store = FileTokenStore::new(config.token_dir.clone());
        Ok(Self::new(Arc::new(api), Arc::new(store), &config.api_url))
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Base URL plus the current bearer token, if any.
    #[must_use]
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(&self.base_url).with_optional_bearer(self.state.borrow().token.clone())
    }

    #[must_use]
    pub fn api(&self) -> &dyn NutritionApi {
        self.api.as_ref()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Resume a persisted session, if any. Never leaves the session in
    /// `Resolving`.
    pub async fn initialize(&self) -> SessionPhase {
        let stored = match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token; starting anonymous");
                None
            }
        };

        let Some(token) = stored else {
            tracing::debug!("no persisted token");
            self.state.send_replace(AuthState::anonymous());
            return SessionPhase::Anonymous;
        };

        self.state.send_replace(AuthState::resolving(token));
        if let Ok(user) = self.refresh_profile().await {
            tracing::info!(username = %user.username, "resumed session");
        }
        self.phase()
    }

    /// # Errors
    ///
    /// Returns a [`SessionError`] carrying the backend detail (or
    /// `"Login failed"`). A rejected login mutates nothing.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let credentials = Credentials { username: username.to_owned(), password: password.to_owned() };
        let anonymous = RequestConfig::new(&self.base_url);
        let response = self.api.login(&anonymous, &credentials).await.map_err(|e| {
            tracing::info!(username, code = e.error_code(), error = %e, "login rejected");
            SessionError::new(Operation::Login, e)
        })?;
        self.adopt_token(response.access_token, Operation::Login).await
    }

    /// # Errors
    ///
    /// Returns a [`SessionError`] carrying the backend detail (or
    /// `"Registration failed"`).
    pub async fn register(&self, registration: &Registration) -> Result<User, SessionError> {
        let anonymous = RequestConfig::new(&self.base_url);
        let response = self.api.register(&anonymous, registration).await.map_err(|e| {
            tracing::info!(username = %registration.username, code = e.error_code(), error = %e, "registration rejected");
            SessionError::new(Operation::Register, e)
        })?;
        self.adopt_token(response.access_token, Operation::Register).await
    }

    /// Persist a freshly issued token and resolve the profile behind it.
    async fn adopt_token(&self, token: String, operation: Operation) -> Result<User, SessionError> {
        if let Err(e) = self.store.set(&token) {
            tracing::warn!(error = %e, "failed to persist auth token; session will not survive a restart");
        }
        self.state.send_replace(AuthState::resolving(token));
        self.refresh_profile().await.map_err(|e| e.for_operation(operation))
    }

    /// Fetch the profile for the current token and cache it.
    ///
    /// Any failure logs the session out, unless the token changed while the
    /// request was in flight.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] for [`Operation::RefreshProfile`]. A
    /// response that arrives after its token was superseded is reported as
    /// [`ApiError::MissingToken`].
    pub async fn refresh_profile(&self) -> Result<User, SessionError> {
        let request = self.request_config();
        let Some(token) = request.bearer().map(ToOwned::to_owned) else {
            self.logout();
            return Err(SessionError::new(Operation::RefreshProfile, ApiError::MissingToken));
        };

        match self.api.fetch_profile(&request).await {
            Ok(user) => {
                let applied = self.state.send_if_modified(|state| {
                    if state.token.as_deref() != Some(token.as_str()) {
                        return false;
                    }
                    state.phase = SessionPhase::Authenticated;
                    state.user = Some(user.clone());
                    true
                });
                if applied {
                    tracing::debug!(username = %user.username, "profile refreshed");
                    Ok(user)
                } else {
                    tracing::debug!("discarding profile response for a superseded token");
                    Err(SessionError::new(Operation::RefreshProfile, ApiError::MissingToken))
                }
            }
            Err(error) => {
                if self.logout_if_current(&token) {
                    tracing::warn!(code = error.error_code(), error = %error, "profile refresh failed; logged out");
                } else {
                    tracing::debug!(error = %error, "profile refresh failed for a superseded token");
                }
                Err(SessionError::new(Operation::RefreshProfile, error))
            }
        }
    }

    /// Submit `update`, then refresh the cached profile.
    ///
    /// A failed update leaves the cached user untouched. A failed refresh
    /// after a successful update still reports success; the resulting
    /// logout is visible on the subscription.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] carrying the backend detail (or
    /// `"Profile update failed"`).
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SessionError> {
        let request = self.request_config();
        if !request.is_authorized() {
            return Err(SessionError::new(Operation::UpdateProfile, ApiError::MissingToken));
        }

        self.api.update_profile(&request, update).await.map_err(|e| {
            tracing::warn!(code = e.error_code(), error = %e, "profile update rejected");
            SessionError::new(Operation::UpdateProfile, e)
        })?;

        if let Err(e) = self.refresh_profile().await {
            tracing::warn!(error = %e, "profile refresh after update failed");
        }
        Ok(())
    }

    /// Purge the token and forget the user. Idempotent.
    pub fn logout(&self) {
        self.clear_store();
        let changed = self.state.send_if_modified(|state| {
            let anonymous = AuthState::anonymous();
            if *state == anonymous {
                return false;
            }
            *state = anonymous;
            true
        });
        if changed {
            tracing::info!("logged out");
        }
    }

    fn logout_if_current(&self, token: &str) -> bool {
        let cleared = self.state.send_if_modified(|state| {
            if state.token.as_deref() != Some(token) {
                return false;
            }
            *state = AuthState::anonymous();
            true
        });
        if cleared {
            self.clear_store();
        }
        cleared
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to purge persisted token");
        }
    }
}
