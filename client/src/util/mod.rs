//! Utility helpers shared across the session and page modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (token persistence, the
//! local calendar) from session and page logic to improve reuse and
//! testability.

pub mod dates;
pub mod token_store;
