//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Catalog prices are never negative; the catalog loader rejects them.
/// Arithmetic between prices keeps the currency of the left operand, and the
/// catalog enforces a single currency so totals never mix currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., roubles, not kopecks).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A price in the default store currency.
    #[must_use]
    pub fn rub(amount: impl Into<Decimal>) -> Self {
        Self::new(amount.into(), CurrencyCode::RUB)
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero(CurrencyCode::default())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut iter = iter.peekable();
        let currency = iter
            .peek()
            .map_or_else(CurrencyCode::default, |p| p.currency_code);
        iter.fold(Self::zero(currency), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.amount.round_dp(2);
        if amount.fract().is_zero() {
            amount = amount.trunc().normalize();
        } else {
            amount.rescale(2);
        }
        match self.currency_code {
            CurrencyCode::RUB => write!(f, "{amount} {}", self.currency_code.symbol()),
            CurrencyCode::USD | CurrencyCode::EUR => {
                write!(f, "{}{amount}", self.currency_code.symbol())
            }
        }
    }
}

/// ISO 4217 currency codes accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    RUB,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::RUB => "₽",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RUB => "RUB",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_multiplies_amount() {
        let price = Price::rub(500);
        assert_eq!(price.times(3), Price::rub(1500));
        assert_eq!(price.times(0), Price::rub(0));
    }

    #[test]
    fn test_sum_keeps_currency_of_first_item() {
        let total: Price = [
            Price::new(Decimal::new(1999, 2), CurrencyCode::USD),
            Price::new(Decimal::new(1, 2), CurrencyCode::USD),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::new(Decimal::new(20, 0), CurrencyCode::USD));
    }

    #[test]
    fn test_sum_of_nothing_is_zero_rub() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::zero(CurrencyCode::RUB));
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::rub(-1).is_negative());
        assert!(!Price::rub(0).is_negative());
        assert!(!Price::rub(Decimal::NEGATIVE_ONE * Decimal::ZERO).is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::rub(1500).to_string(), "1500 ₽");
        assert_eq!(
            Price::new(Decimal::new(1990, 2), CurrencyCode::USD).to_string(),
            "$19.90"
        );
        assert_eq!(
            Price::new(Decimal::new(5, 0), CurrencyCode::EUR).to_string(),
            "€5"
        );
    }

    #[test]
    fn test_deserializes_numeric_amount_with_default_currency() {
        let price: Option<Price> = serde_json::from_str(r#"{"amount": 450}"#).ok();
        assert_eq!(price, Some(Price::rub(450)));
    }
}
