//! Hosting a [`ShopState`] inside a browser session.
//!
//! Each request opens the visitor's shop from the two session slots, runs
//! one operation and writes the changed slots back. Requests from one
//! browser already run one at a time behind
//! [`browser_lock_middleware`](crate::middleware::browser_lock_middleware),
//! which also covers the session layer's load and save of the record.

use std::collections::{HashMap, HashSet};

use amarine_core::shop::{
    CART_STORAGE_KEY, DurableStorage, FAVORITES_STORAGE_KEY, Notification, ShopParts, ShopState,
    StorageError, SuppressionLedger, TracingSink,
};
use tokio::sync::OwnedMutexGuard;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Result;
use crate::state::{AppState, SharedClock};

/// Session keys owned by the storefront.
pub mod keys {
    /// Key for the visitor id that scopes notification history.
    pub const VISITOR_ID: &str = "visitor_id";
}

const SLOT_KEYS: [&str; 2] = [CART_STORAGE_KEY, FAVORITES_STORAGE_KEY];

/// Notifications are collected for the response and logged.
pub type SessionSink = (Vec<Notification>, TracingSink);

/// A shop whose storage is a session snapshot.
pub type SessionShop = ShopState<SessionSlots, SessionSink, SharedClock>;

/// Snapshot of a session's shop slots.
///
/// Reads are served from the snapshot; writes are collected and flushed to
/// the session when the request finishes.
#[derive(Debug, Default)]
pub struct SessionSlots {
    values: HashMap<String, String>,
    unreadable: HashMap<String, String>,
    dirty: HashSet<String>,
}

impl SessionSlots {
    /// Read the shop slots of `session`.
    ///
    /// A slot that cannot be read is remembered as unavailable rather than
    /// failing the request.
    pub async fn read(session: &Session) -> Self {
        let mut slots = Self::default();
        for key in SLOT_KEYS {
            match session.get::<String>(key).await {
                Ok(Some(value)) => {
                    slots.values.insert(key.to_owned(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    slots.unreadable.insert(key.to_owned(), e.to_string());
                }
            }
        }
        slots
    }

    /// Write changed slots back to `session`, logging failures.
    pub async fn flush(self, session: &Session) {
        for key in &self.dirty {
            let Some(value) = self.values.get(key) else {
                continue;
            };
            if let Err(e) = session.insert(key, value).await {
                tracing::warn!(key = %key, error = %e, "Failed to store shop slot in session");
            }
        }
    }

    /// Whether `key` was written since the snapshot was read.
    #[must_use]
    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }
}

impl DurableStorage for SessionSlots {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        if let Some(error) = self.unreadable.get(key) {
            return Err(StorageError::Unavailable(error.clone()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> std::result::Result<(), StorageError> {
        self.unreadable.remove(key);
        self.values.insert(key.to_owned(), value);
        self.dirty.insert(key.to_owned());
        Ok(())
    }
}

/// A visitor's shop, open for the duration of one request.
pub struct ShopSession {
    session: Session,
    ledger: OwnedMutexGuard<SuppressionLedger>,
    shop: SessionShop,
}

impl ShopSession {
    /// Open the shop of the browser behind `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor id cannot be read or stored.
    pub async fn open(state: &AppState, session: Session) -> Result<Self> {
        let visitor = visitor_id(&session).await?;
        let ledger = state.ledger_for(visitor).await.lock_owned().await;
        let slots = SessionSlots::read(&session).await;
        let shop = ShopState::open(slots, (Vec::new(), TracingSink), state.clock())
            .with_ledger(ledger.clone());

        Ok(Self {
            session,
            ledger,
            shop,
        })
    }

    #[must_use]
    pub const fn shop(&self) -> &SessionShop {
        &self.shop
    }

    pub const fn shop_mut(&mut self) -> &mut SessionShop {
        &mut self.shop
    }

    /// Save the shop and return the notifications emitted while it was open.
    pub async fn finish(self) -> Vec<Notification> {
        let Self {
            session,
            mut ledger,
            shop,
        } = self;
        let ShopParts {
            storage,
            sink,
            ledger: updated,
        } = shop.into_parts();

        *ledger = updated;
        storage.flush(&session).await;
        sink.0
    }
}

/// The visitor id of `session`, assigned on first use.
async fn visitor_id(session: &Session) -> Result<Uuid> {
    if let Some(id) = session.get::<Uuid>(keys::VISITOR_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(keys::VISITOR_ID, id).await?;
    tracing::debug!(visitor_id = %id, "New visitor");
    Ok(id)
}
