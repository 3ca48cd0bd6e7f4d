//! Auth-session snapshot for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Published by the session manager on a watch channel. Route guards and
//! user-aware screens read it to decide between login redirects and
//! identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;

use crate::net::types::User;

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing has been read from storage yet.
    #[default]
    Unresolved,
    /// A token is held and the profile fetch is in flight.
    Resolving,
    Authenticated,
    Anonymous,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolving => "resolving",
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the session.
///
/// `user` is present only when `phase` is `Authenticated`; `token` is
/// present while `Resolving` or `Authenticated`.
#[derive(Clone, Default, PartialEq)]
pub struct AuthState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { phase: SessionPhase::Anonymous, user: None, token: None }
    }

    #[must_use]
    pub fn resolving(token: impl Into<String>) -> Self {
        Self { phase: SessionPhase::Resolving, user: None, token: Some(token.into()) }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Unresolved | SessionPhase::Resolving)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && self.user.is_some()
    }

    /// Whether a guarded screen should send the user to the login page.
    #[must_use]
    pub fn should_redirect_to_login(&self) -> bool {
        !self.is_loading() && self.user.is_none()
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("phase", &self.phase)
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
