//! Integration tests for the Amarine storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p amarine-integration-tests
//! ```
//!
//! Each test spawns its own storefront on an ephemeral port, backed by the
//! bundled catalog and a manual clock, and talks to it over HTTP with a
//! cookie-keeping client that plays the part of one browser.

use std::net::SocketAddr;
use std::sync::Arc;

use amarine_core::shop::ManualClock;
use amarine_storefront::catalog::Catalog;
use amarine_storefront::config::StorefrontConfig;
use amarine_storefront::state::AppState;
use reqwest::Client;

const CATALOG: &str = include_str!("../../storefront/data/catalog.json");

/// A running storefront and a browser talking to it.
pub struct TestContext {
    pub addr: SocketAddr,
    pub client: Client,
    pub clock: ManualClock,
}

impl TestContext {
    /// Start a storefront with no simulated processing delays.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start() -> Self {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "AMARINE_BASE_URL" => Some("http://127.0.0.1".to_string()),
            "AMARINE_CHECKOUT_DELAY_MS" | "AMARINE_REVIEW_DELAY_MS" => Some("0".to_string()),
            _ => None,
        })
        .expect("test configuration is valid");
        let catalog = Catalog::from_json(CATALOG).expect("bundled catalog is valid");
        let clock = ManualClock::default();
        let state = AppState::with_clock(config, catalog, Arc::new(clock.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        let app = amarine_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            addr,
            client: Self::browser(),
            clock,
        }
    }

    /// A fresh client with its own cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn browser() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL of `path` on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}
