//! Catalog and product route handlers.

use amarine_core::{Category, CategoryId, Difficulty, Product, Review};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::find_product;
use crate::catalog::{CatalogQuery, SortOrder, average_rating};
use crate::error::{AppError, Result};
use crate::reviews::{AcceptedReview, REVIEW_ACCEPTED, ReviewSubmission};
use crate::shop_session::ShopSession;
use crate::state::AppState;

/// Product listing query parameters.
///
/// `difficulty` and `category` accept comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ListingQuery {
    fn to_catalog_query(&self) -> Result<CatalogQuery> {
        let difficulties = split_list(self.difficulty.as_deref())
            .map(str::parse::<Difficulty>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let categories = split_list(self.category.as_deref())
            .map(CategoryId::from)
            .collect();

        Ok(CatalogQuery {
            text: self.q.clone(),
            difficulties,
            categories,
            sort: self.sort.unwrap_or_default(),
        })
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
    pub active_filters: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
    pub reviews: Vec<Review>,
    pub rating: String,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct ReviewReceipt {
    pub message: &'static str,
    pub review: AcceptedReview,
}

/// List all categories.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().to_vec())
}

/// List products matching the query.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ProductList>> {
    let query = query.to_catalog_query()?;
    let products: Vec<Product> = state
        .catalog()
        .search(&query)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductList {
        total: products.len(),
        active_filters: query.active_filters(),
        products,
    }))
}

/// Show one product with related products and reviews.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = find_product(&state, &id)?;
    let catalog = state.catalog();

    let reviews = catalog.reviews_for(&product);
    let rating = average_rating(&reviews);
    let reviews = reviews.into_iter().cloned().collect();
    let related = catalog.related(&product).into_iter().cloned().collect();

    let shop = ShopSession::open(&state, session).await?;
    let is_favorite = shop.shop().is_in_favorites(&product.id);
    shop.finish().await;

    Ok(Json(ProductDetail {
        product,
        related,
        reviews,
        rating,
        is_favorite,
    }))
}

/// Accept a review for moderation.
#[instrument(skip(state, submission))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(submission): Json<ReviewSubmission>,
) -> Result<Json<ReviewReceipt>> {
    let product = find_product(&state, &id)?;
    let review = submission.validate()?;

    tokio::time::sleep(state.config().review_delay).await;
    tracing::info!(product_id = %product.id, rating = review.rating, "Review submitted for moderation");

    Ok(Json(ReviewReceipt {
        message: REVIEW_ACCEPTED,
        review,
    }))
}
