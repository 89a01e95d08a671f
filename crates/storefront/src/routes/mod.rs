//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Health check
//!
//! # Catalog
//! GET  /api/catalog/categories        - Category list
//! GET  /api/products                  - Product listing (q, difficulty, category, sort)
//! GET  /api/products/{id}             - Product detail with related products and reviews
//! POST /api/products/{id}/reviews     - Submit a review for moderation
//!
//! # Cart
//! GET  /api/cart                      - Cart summary
//! GET  /api/cart/count                - Number of units in the cart
//! POST /api/cart/add                  - Add a product
//! POST /api/cart/update               - Set a product's quantity
//! POST /api/cart/remove               - Remove a product
//! POST /api/cart/clear                - Empty the cart
//!
//! # Favorites
//! GET  /api/favorites                 - Favorite products
//! POST /api/favorites/toggle          - Add or remove a favorite
//!
//! # Checkout
//! POST /api/checkout                  - Place an order
//! ```
//!
//! Every request that changes the shop answers with the notifications the
//! shop emitted while handling it.

pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod products;

use amarine_core::Product;
use amarine_core::shop::Notification;
use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// A response body together with the notifications produced by the request.
#[derive(Debug, Serialize)]
pub struct WithNotifications<T> {
    #[serde(flatten)]
    pub body: T,
    pub notifications: Vec<Notification>,
}

impl<T> WithNotifications<T> {
    pub const fn new(body: T, notifications: Vec<Notification>) -> Self {
        Self {
            body,
            notifications,
        }
    }
}

/// Look up a product or fail with 404.
pub(crate) fn find_product(state: &AppState, id: &str) -> Result<Product> {
    state
        .catalog()
        .product(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/categories", get(products::categories))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(products::submit_review))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/toggle", post(favorites::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/catalog", catalog_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/favorites", favorite_routes())
        .route("/api/checkout", post(checkout::place))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
