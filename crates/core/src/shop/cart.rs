//! Cart entries and the list operations the shop is built from.
//!
//! These functions only touch the in-memory lists. Persistence and
//! notifications are layered on top by [`super::ShopState`].

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A product in the cart with how many units the customer wants.
///
/// The quantity is never zero; a stored entry with quantity 0 fails to
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartEntry {
    /// A new entry holding one unit of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Quantity as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// Result of adding one unit to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    /// The product was not in the cart and now has an entry of one.
    Inserted,
    /// The existing entry grew to the contained quantity.
    Incremented(NonZeroU32),
}

pub(crate) fn add_one(cart: &mut Vec<CartEntry>, product: &Product) -> Added {
    if let Some(entry) = cart.iter_mut().find(|e| e.product.id == product.id) {
        entry.quantity = entry.quantity.saturating_add(1);
        Added::Incremented(entry.quantity)
    } else {
        cart.push(CartEntry::new(product.clone()));
        Added::Inserted
    }
}

pub(crate) fn remove(cart: &mut Vec<CartEntry>, id: &ProductId) -> Option<CartEntry> {
    let index = cart.iter().position(|e| &e.product.id == id)?;
    Some(cart.remove(index))
}

/// Replace the quantity of an existing entry. Returns `false` if absent.
pub(crate) fn set_quantity(cart: &mut [CartEntry], id: &ProductId, quantity: NonZeroU32) -> bool {
    match cart.iter_mut().find(|e| &e.product.id == id) {
        Some(entry) => {
            entry.quantity = quantity;
            true
        }
        None => false,
    }
}

/// Merge entries that share a product ID, summing their quantities.
///
/// The first occurrence keeps its position and product snapshot.
pub(crate) fn merge_duplicates(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|e| e.product.id == entry.product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity.get());
            }
            None => merged.push(entry),
        }
    }
    merged
}

/// Add or remove `id`. Returns whether it is a favorite afterwards.
pub(crate) fn toggle_favorite(favorites: &mut Vec<ProductId>, id: &ProductId) -> bool {
    let before = favorites.len();
    favorites.retain(|f| f != id);
    if favorites.len() == before {
        favorites.push(id.clone());
        true
    } else {
        false
    }
}

/// Make `id`'s membership match `favorite`.
pub(crate) fn set_favorite(favorites: &mut Vec<ProductId>, id: &ProductId, favorite: bool) {
    let present = favorites.contains(id);
    if favorite && !present {
        favorites.push(id.clone());
    } else if !favorite && present {
        favorites.retain(|f| f != id);
    }
}

/// Drop repeated IDs, keeping first occurrences in order.
pub(crate) fn dedup_favorites(favorites: Vec<ProductId>) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(favorites.len());
    favorites
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
