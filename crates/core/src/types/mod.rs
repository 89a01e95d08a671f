//! Core types for Amarine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use contact::{ContactError, Email, Phone};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{Badge, Category, Difficulty, Product, Review, UnknownDifficulty};
pub use status::{OrderStatus, PaymentMethod};
