//! Values derived from the shop's collections for presentation.
//!
//! Everything here is a pure function of the current lists and is
//! recomputed on every read.

use serde::Serialize;

use super::cart::CartEntry;
use crate::types::{Price, Product, ProductId};

/// Sum of price times quantity over all entries.
#[must_use]
pub fn cart_total(entries: &[CartEntry]) -> Price {
    entries.iter().map(line_total).sum()
}

/// Total number of units, not distinct entries.
#[must_use]
pub fn cart_count(entries: &[CartEntry]) -> u64 {
    entries.iter().map(|e| u64::from(e.quantity())).sum()
}

/// Price of one cart line.
#[must_use]
pub fn line_total(entry: &CartEntry) -> Price {
    entry.product.price.times(entry.quantity())
}

/// Whether `id` is among `favorites`.
#[must_use]
pub fn is_favorite(favorites: &[ProductId], id: &ProductId) -> bool {
    favorites.contains(id)
}

/// One line of a [`CartSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// Snapshot of the cart for rendering: lines, total and unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub count: u64,
}

impl CartSummary {
    /// Summarize `entries`.
    #[must_use]
    pub fn from_entries(entries: &[CartEntry]) -> Self {
        Self {
            lines: entries
                .iter()
                .map(|e| CartLine {
                    product: e.product.clone(),
                    quantity: e.quantity(),
                    line_total: line_total(e),
                })
                .collect(),
            total: cart_total(entries),
            count: cart_count(entries),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn entry(id: &str, price: i64, quantity: u32) -> CartEntry {
        CartEntry {
            product: Product::new(id, id, Price::rub(price)),
            quantity: NonZeroU32::new(quantity).unwrap(),
        }
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_total(&[]), Price::rub(0));
        assert_eq!(cart_count(&[]), 0);
        assert!(CartSummary::from_entries(&[]).is_empty());
    }

    #[test]
    fn test_total_and_count() {
        let entries = [entry("1", 500, 3), entry("2", 300, 1)];
        assert_eq!(cart_total(&entries), Price::rub(1800));
        assert_eq!(cart_count(&entries), 4);
    }

    #[test]
    fn test_summary_lines() {
        let summary = CartSummary::from_entries(&[entry("1", 250, 2)]);
        assert_eq!(summary.lines[0].line_total, Price::rub(500));
        assert_eq!(summary.lines[0].quantity, 2);
        assert_eq!(summary.total, Price::rub(500));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_is_favorite() {
        let favorites = vec![ProductId::from("1")];
        assert!(is_favorite(&favorites, &ProductId::from("1")));
        assert!(!is_favorite(&favorites, &ProductId::from("2")));
    }
}
