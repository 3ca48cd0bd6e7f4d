//! Networking modules for the FitTrack REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `request` carries the explicit per-call base URL
//! and bearer credential, and `types` defines the shared wire schema.

pub mod api;
pub mod request;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
