//! PhotoFlex client core: the UI-independent logic of a photo-sharing app.
//!
//! This crate contains everything a frontend needs except rendering:
//! the backend API client, background request worker, user roster pub/sub,
//! the mention-aware comment composer, screen navigation, form validation,
//! and session persistence.

/// The JSON-over-HTTP client for the PhotoFlex backend.
pub mod api;
/// The comment composer state machine with mention suggestions.
pub mod composer;
/// Detecting, suggesting, applying, and rendering `@username` mentions.
pub mod mention;
/// The data model mirroring the backend's JSON entities.
pub mod models;
/// The background worker that runs backend requests off the UI thread.
pub mod requests;
/// Ref-counted pub/sub for the user roster.
pub mod roster;
/// Screen navigation and the logged-in user.
pub mod screens;
/// Saving and restoring the login session.
pub mod session;
/// String helpers that are safe on non-ASCII text.
pub mod utils;
/// Signup-form validation and password strength.
pub mod validation;

/// The name of this application.
pub const APP_NAME: &str = "PhotoFlex";

/// The default backend base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Initializes structured logging for binaries embedding this crate.
pub fn init_logging() {
    tracing_subscriber::fmt::init();
}
