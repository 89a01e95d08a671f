//! Checkout route handler.

use amarine_core::shop::Clock;
use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::WithNotifications;
use crate::checkout::{CheckoutForm, Order, ensure_not_empty, generate_order_number, place_order};
use crate::error::Result;
use crate::shop_session::ShopSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub order: Order,
}

/// Place an order for everything in the cart.
///
/// The form and the cart are checked before the processing delay.
#[instrument(skip(state, session, form))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<WithNotifications<OrderPlaced>>> {
    let customer = form.validate()?;

    let mut shop = ShopSession::open(&state, session).await?;
    ensure_not_empty(shop.shop())?;

    tokio::time::sleep(state.config().checkout_delay).await;

    let number = generate_order_number(&mut rand::rng());
    let placed_at = state.clock().now();
    let order = place_order(
        shop.shop_mut(),
        customer,
        form.payment_method,
        number,
        placed_at,
    )?;
    let notifications = shop.finish().await;

    Ok(Json(WithNotifications::new(
        OrderPlaced { order },
        notifications,
    )))
}
