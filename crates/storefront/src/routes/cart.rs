//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every change answers with the
//! fresh cart summary and the notifications it produced.

use amarine_core::ProductId;
use amarine_core::shop::CartSummary;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{WithNotifications, find_product};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::shop_session::ShopSession;
use crate::state::AppState;

/// Most units that can be added in one request.
pub const MAX_ADD_QUANTITY: u32 = 99;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
///
/// A quantity of zero or less removes the product.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct CartBody {
    pub cart: CartSummary,
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

type CartResponse = Json<WithNotifications<CartBody>>;

async fn respond(shop: ShopSession) -> CartResponse {
    let cart = shop.shop().summary();
    let notifications = shop.finish().await;
    Json(WithNotifications::new(CartBody { cart }, notifications))
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let shop = ShopSession::open(&state, session).await?;
    let summary = shop.shop().summary();
    shop.finish().await;
    Ok(Json(summary))
}

/// Number of units in the cart, for the header badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCount>> {
    let shop = ShopSession::open(&state, session).await?;
    let count = shop.shop().cart_count();
    shop.finish().await;
    Ok(Json(CartCount { count }))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<CartResponse> {
    let quantity = request.quantity.unwrap_or(1);
    if !(1..=MAX_ADD_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_ADD_QUANTITY}"
        )));
    }
    let product = find_product(&state, request.product_id.as_str())?;

    let mut shop = ShopSession::open(&state, session).await?;
    for _ in 0..quantity {
        shop.shop_mut().add_to_cart(&product);
    }
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));

    Ok(respond(shop).await)
}

/// Set the quantity of a product already in the cart.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<CartResponse> {
    let mut shop = ShopSession::open(&state, session).await?;
    shop.shop_mut()
        .update_quantity(&request.product_id, request.quantity);
    Ok(respond(shop).await)
}

/// Remove a product from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<CartResponse> {
    let mut shop = ShopSession::open(&state, session).await?;
    shop.shop_mut().remove_from_cart(&request.product_id);
    Ok(respond(shop).await)
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<CartResponse> {
    let mut shop = ShopSession::open(&state, session).await?;
    shop.shop_mut().clear_cart();
    Ok(respond(shop).await)
}
