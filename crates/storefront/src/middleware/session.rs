//! Session middleware configuration.
//!
//! Every browser gets a cookie-identified session kept in memory. The
//! session holds the browser's stored cart and favorites slots and its
//! visitor id.

use std::time::Duration;

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "amarine_session";

/// Session expiry after inactivity (30 days).
pub const SESSION_EXPIRY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let expiry = tower_sessions::cookie::time::Duration::try_from(SESSION_EXPIRY)
        .unwrap_or(tower_sessions::cookie::time::Duration::WEEK);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(expiry))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
