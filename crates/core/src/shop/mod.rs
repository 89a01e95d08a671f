//! Shop state container: the customer's cart and favorites.
//!
//! [`ShopState`] is the single owner of both collections. Every change goes
//! through its operations, which keep the lists consistent, write them back
//! to [`DurableStorage`], and tell a [`NotificationSink`] what happened,
//! throttled per subject by a [`SuppressionLedger`].
//!
//! # Lifecycle
//!
//! A container starts [`Phase::Uninitialized`]. Operations are accepted in
//! that phase and change the in-memory lists right away, but nothing is
//! written until [`ShopState::load`] has read the stored collections. `load`
//! then replays the early changes on top of what was stored and writes the
//! result once, so an empty default never overwrites saved data.
//!
//! # Example
//!
//! ```
//! use amarine_core::shop::{MemoryStorage, Notification, ShopState, SystemClock};
//! use amarine_core::{Price, Product};
//!
//! let toasts: Vec<Notification> = Vec::new();
//! let mut shop = ShopState::open(MemoryStorage::new(), toasts, SystemClock);
//! let rose = Product::new("p1", "Rose", Price::rub(500));
//!
//! shop.add_to_cart(&rose);
//! shop.add_to_cart(&rose);
//!
//! assert_eq!(shop.cart_total(), Price::rub(1000));
//! assert_eq!(shop.cart_count(), 2);
//! assert_eq!(shop.sink().len(), 1);
//! ```

mod cart;
mod ledger;
mod notify;
mod storage;
pub mod view;

use std::num::NonZeroU32;

pub use cart::{Added, CartEntry};
pub use ledger::{
    Clock, ManualClock, SUPPRESSION_WINDOW_MS, Subject, SuppressionLedger, SystemClock,
};
pub use notify::{
    ActionKind, Notification, NotificationAction, NotificationSink, Severity, TracingSink,
};
pub use storage::{
    CART_STORAGE_KEY, DurableStorage, FAVORITES_STORAGE_KEY, MemoryStorage, StorageError,
    read_slot, write_slot,
};
pub use view::{CartLine, CartSummary};

use crate::types::{Price, Product, ProductId};

/// Whether the stored collections have been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Storage has not been read; writes are held back.
    Uninitialized,
    /// Storage has been read; every change is written through.
    Ready,
}

/// A change made before storage was loaded, kept for replay.
#[derive(Debug, Clone)]
enum Change {
    Add(Product),
    Remove(ProductId),
    SetQuantity(ProductId, NonZeroU32),
    Clear,
    SetFavorite(ProductId, bool),
}

/// Which stored collection a change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Cart,
    Favorites,
}

impl Change {
    const fn slot(&self) -> Slot {
        match self {
            Self::Add(_) | Self::Remove(_) | Self::SetQuantity(..) | Self::Clear => Slot::Cart,
            Self::SetFavorite(..) => Slot::Favorites,
        }
    }
}

/// Everything a container owned, handed back by [`ShopState::into_parts`].
#[derive(Debug)]
pub struct ShopParts<S, N> {
    pub storage: S,
    pub sink: N,
    pub ledger: SuppressionLedger,
}

/// The cart and favorites of one customer.
#[derive(Debug)]
pub struct ShopState<S, N, C = SystemClock> {
    storage: S,
    sink: N,
    clock: C,
    cart: Vec<CartEntry>,
    favorites: Vec<ProductId>,
    ledger: SuppressionLedger,
    phase: Phase,
    pending: Vec<Change>,
}

impl<S, N, C> ShopState<S, N, C>
where
    S: DurableStorage,
    N: NotificationSink,
    C: Clock,
{
    /// Create an uninitialized container with empty collections.
    ///
    /// Call [`load`](Self::load) before relying on the stored state.
    #[must_use]
    pub fn new(storage: S, sink: N, clock: C) -> Self {
        Self {
            storage,
            sink,
            clock,
            cart: Vec::new(),
            favorites: Vec::new(),
            ledger: SuppressionLedger::new(),
            phase: Phase::Uninitialized,
            pending: Vec::new(),
        }
    }

    /// Create a container and load it from storage immediately.
    #[must_use]
    pub fn open(storage: S, sink: N, clock: C) -> Self {
        let mut shop = Self::new(storage, sink, clock);
        shop.load();
        shop
    }

    /// Use `ledger` instead of a fresh one.
    ///
    /// Lets a host keep notification history across container instances
    /// that serve the same browsing session.
    #[must_use]
    pub fn with_ledger(mut self, ledger: SuppressionLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Read the stored collections and start writing through.
    ///
    /// Missing or malformed slots load as empty collections. Changes made
    /// while uninitialized are replayed on top of the loaded state and then
    /// written. Calling `load` again has no effect.
    pub fn load(&mut self) {
        if self.phase == Phase::Ready {
            return;
        }

        self.cart = read_slot::<Vec<CartEntry>, _>(&self.storage, CART_STORAGE_KEY)
            .map(cart::merge_duplicates)
            .unwrap_or_default();
        self.favorites = read_slot::<Vec<ProductId>, _>(&self.storage, FAVORITES_STORAGE_KEY)
            .map(cart::dedup_favorites)
            .unwrap_or_default();
        self.phase = Phase::Ready;

        let pending = std::mem::take(&mut self.pending);
        let mut touched_cart = false;
        let mut touched_favorites = false;
        for change in &pending {
            match change.slot() {
                Slot::Cart => touched_cart = true,
                Slot::Favorites => touched_favorites = true,
            }
        }
        let replayed = pending.len();
        for change in pending {
            self.apply(change);
        }
        if touched_cart {
            self.persist(Slot::Cart);
        }
        if touched_favorites {
            self.persist(Slot::Favorites);
        }

        tracing::debug!(
            entries = self.cart.len(),
            favorites = self.favorites.len(),
            replayed,
            "Shop state loaded"
        );
    }

    /// Add one unit of `product`, creating its entry if needed.
    pub fn add_to_cart(&mut self, product: &Product) {
        let added = cart::add_one(&mut self.cart, product);

        if self.admit(&Subject::CartAdd(&product.id)) {
            let notification = match added {
                Added::Inserted => Notification::success(format!("Added to cart: {}", product.name))
                    .with_description("Open the cart to place your order")
                    .with_action("Open cart", ActionKind::OpenCart),
                Added::Incremented(quantity) => {
                    Notification::success(format!("Added one more: {}", product.name))
                        .with_description(format!("In cart: {quantity} pcs."))
                }
            };
            self.sink.notify(notification);
        }

        self.commit(Change::Add(product.clone()));
    }

    /// Remove the entry for `id`, if any.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        if let Some(removed) = cart::remove(&mut self.cart, id)
            && self.admit(&Subject::CartRemove(id))
        {
            self.sink.notify(Notification::info(format!(
                "Removed from cart: {}",
                removed.product.name
            )));
        }

        self.commit(Change::Remove(id.clone()));
    }

    /// Set the entry for `id` to exactly `quantity` units.
    ///
    /// A quantity of zero or less removes the entry. Updating a product that
    /// is not in the cart does nothing.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        let Some(quantity) = NonZeroU32::new(clamped) else {
            self.remove_from_cart(id);
            return;
        };

        if cart::set_quantity(&mut self.cart, id, quantity) {
            self.commit(Change::SetQuantity(id.clone(), quantity));
        } else {
            tracing::debug!(product_id = %id, "Ignoring quantity update for product not in cart");
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.sink.notify(Notification::info("Cart cleared"));
        self.commit(Change::Clear);
    }

    /// Add `product` to favorites, or remove it if already there.
    pub fn toggle_favorite(&mut self, product: &Product) {
        let favorite = cart::toggle_favorite(&mut self.favorites, &product.id);

        if self.admit(&Subject::Favorite(&product.id)) {
            let notification = if favorite {
                Notification::success(format!("Added to favorites: {}", product.name))
            } else {
                Notification::info(format!("Removed from favorites: {}", product.name))
            };
            self.sink.notify(notification);
        }

        self.commit(Change::SetFavorite(product.id.clone(), favorite));
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_in_favorites(&self, id: &ProductId) -> bool {
        view::is_favorite(&self.favorites, id)
    }

    /// Sum of price times quantity over the cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        view::cart_total(&self.cart)
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        view::cart_count(&self.cart)
    }

    /// Cart snapshot for rendering.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_entries(&self.cart)
    }

    /// Current cart entries, in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[CartEntry] {
        &self.cart
    }

    /// Current favorite IDs, in insertion order.
    #[must_use]
    pub fn favorites(&self) -> &[ProductId] {
        &self.favorites
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Notification history of this container.
    #[must_use]
    pub const fn ledger(&self) -> &SuppressionLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear the container down, returning what it owned.
    #[must_use]
    pub fn into_parts(self) -> ShopParts<S, N> {
        ShopParts {
            storage: self.storage,
            sink: self.sink,
            ledger: self.ledger,
        }
    }

    fn admit(&mut self, subject: &Subject<'_>) -> bool {
        let now = self.clock.now();
        self.ledger.admit(subject, now)
    }

    /// Record a change that has already been applied in memory.
    fn commit(&mut self, change: Change) {
        match self.phase {
            Phase::Ready => self.persist(change.slot()),
            Phase::Uninitialized => self.pending.push(change),
        }
    }

    /// Apply a replayed change to the in-memory lists.
    fn apply(&mut self, change: Change) {
        match change {
            Change::Add(product) => {
                cart::add_one(&mut self.cart, &product);
            }
            Change::Remove(id) => {
                cart::remove(&mut self.cart, &id);
            }
            Change::SetQuantity(id, quantity) => {
                cart::set_quantity(&mut self.cart, &id, quantity);
            }
            Change::Clear => self.cart.clear(),
            Change::SetFavorite(id, favorite) => {
                cart::set_favorite(&mut self.favorites, &id, favorite);
            }
        }
    }

    fn persist(&mut self, slot: Slot) {
        match slot {
            Slot::Cart => write_slot(&mut self.storage, CART_STORAGE_KEY, &self.cart),
            Slot::Favorites => write_slot(&mut self.storage, FAVORITES_STORAGE_KEY, &self.favorites),
        }
    }
}
