//! # fittrack-client
//!
//! Client library for the FitTrack nutrition and fitness REST backend.
//!
//! The crate is organized the way a front end consumes it:
//!
//! - [`state`] owns the session: who is logged in, the bearer token, and
//!   the observable snapshot every screen renders from.
//! - [`net`] holds the wire schema and the REST client.
//! - [`pages`] contains the non-visual logic behind each screen (dashboard,
//!   food search and logging, weight tracking, profile, registration).
//! - [`util`] isolates token persistence and calendar-date handling.

pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

pub use config::ClientConfig;
pub use error::{ErrorClass, ErrorCode, Operation};
pub use state::session::SessionManager;
