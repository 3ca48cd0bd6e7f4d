//! Session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` defines the immutable snapshot consumers render from; `session`
//! owns the manager that mutates and publishes it.

pub mod auth;
pub mod session;
