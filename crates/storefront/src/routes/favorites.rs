//! Favorites route handlers.

use amarine_core::{Product, ProductId};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{WithNotifications, find_product};
use crate::error::Result;
use crate::shop_session::ShopSession;
use crate::state::AppState;

/// Toggle favorite request body.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct FavoriteList {
    /// Favorite IDs in the order they were added.
    pub ids: Vec<ProductId>,
    /// Favorites still present in the catalog.
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ToggledFavorite {
    pub product_id: ProductId,
    pub is_favorite: bool,
    pub favorites: Vec<ProductId>,
}

/// List the visitor's favorite products.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Json<FavoriteList>> {
    let shop = ShopSession::open(&state, session).await?;
    let ids = shop.shop().favorites().to_vec();
    shop.finish().await;

    let products = ids
        .iter()
        .filter_map(|id| state.catalog().product(id.as_str()).cloned())
        .collect();
    Ok(Json(FavoriteList { ids, products }))
}

/// Add a product to favorites, or remove it if already there.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<ToggleFavoriteRequest>,
) -> Result<Json<WithNotifications<ToggledFavorite>>> {
    let product = find_product(&state, request.product_id.as_str())?;

    let mut shop = ShopSession::open(&state, session).await?;
    shop.shop_mut().toggle_favorite(&product);
    let is_favorite = shop.shop().is_in_favorites(&product.id);
    let favorites = shop.shop().favorites().to_vec();
    let notifications = shop.finish().await;

    Ok(Json(WithNotifications::new(
        ToggledFavorite {
            product_id: product.id,
            is_favorite,
            favorites,
        },
        notifications,
    )))
}
