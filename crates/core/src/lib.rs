//! Amarine Core - Shared types and shop state.
//!
//! This crate provides the pieces every Amarine component shares:
//! - `storefront` - HTTP service hosting the shop per browser
//! - `cli` - Catalog tooling
//!
//! # Architecture
//!
//! The core crate performs no I/O of its own. The shop state container talks
//! to its surroundings only through the [`shop::DurableStorage`],
//! [`shop::NotificationSink`] and [`shop::Clock`] traits, so it can be hosted
//! by a session store, an in-memory map, or a test double.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, contact details and statuses
//! - [`shop`] - Cart and favorites state container with derived views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod shop;
pub mod types;

pub use types::*;
