//! Application state shared across handlers.

use std::sync::Arc;

use amarine_core::shop::{Clock, SuppressionLedger, SystemClock};
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_EXPIRY;

/// Upper bound on visitors whose notification history is kept in memory.
const MAX_TRACKED_VISITORS: u64 = 100_000;

/// Wall clock shared by every request.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Notification history of one visitor, locked for the length of a request.
pub type VisitorLedger = Arc<Mutex<SuppressionLedger>>;

/// Held while one request of a browser runs, session load and save included.
pub type BrowserLock = Arc<Mutex<()>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the catalog and per-visitor shop state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    ledgers: Cache<Uuid, VisitorLedger>,
    browser_locks: Cache<String, BrowserLock>,
    clock: SharedClock,
}

impl AppState {
    /// Create a new application state using the system clock.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_clock(config, catalog, Arc::new(SystemClock))
    }

    /// Create a new application state reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: StorefrontConfig, catalog: Catalog, clock: SharedClock) -> Self {
        // Notification history lives exactly as long as an idle session.
        let ledgers = Cache::builder()
            .max_capacity(MAX_TRACKED_VISITORS)
            .time_to_idle(SESSION_EXPIRY)
            .build();
        let browser_locks = Cache::builder()
            .max_capacity(MAX_TRACKED_VISITORS)
            .time_to_idle(SESSION_EXPIRY)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                ledgers,
                browser_locks,
                clock,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a handle to the shared clock.
    #[must_use]
    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.inner.clock)
    }

    /// Notification history of `visitor`, created empty on first use.
    pub async fn ledger_for(&self, visitor: Uuid) -> VisitorLedger {
        self.inner
            .ledgers
            .get_with(visitor, async { Arc::new(Mutex::new(SuppressionLedger::new())) })
            .await
    }

    /// Request lock of the browser holding session cookie `session_id`.
    pub async fn browser_lock(&self, session_id: &str) -> BrowserLock {
        self.inner
            .browser_locks
            .get_with(session_id.to_owned(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use amarine_core::ProductId;
    use amarine_core::shop::Subject;
    use chrono::Utc;

    use super::*;

    fn state() -> AppState {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "AMARINE_BASE_URL").then(|| "http://localhost".to_string())
        })
        .unwrap();
        AppState::new(config, Catalog::from_json(r#"{"products": []}"#).unwrap())
    }

    #[tokio::test]
    async fn test_ledger_is_shared_per_visitor() {
        let state = state();
        let visitor = Uuid::new_v4();
        let id = ProductId::from("1");

        let ledger = state.ledger_for(visitor).await;
        assert!(ledger.lock().await.admit(&Subject::CartAdd(&id), Utc::now()));

        assert_eq!(state.ledger_for(visitor).await.lock().await.len(), 1);
        assert!(state.ledger_for(Uuid::new_v4()).await.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_browser_lock_is_shared_per_session_cookie() {
        let state = state();

        let held = state.browser_lock("abc").await;
        let _guard = held.lock().await;

        assert!(state.browser_lock("abc").await.try_lock().is_err());
        assert!(state.browser_lock("xyz").await.try_lock().is_ok());
    }
}
