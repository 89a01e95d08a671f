//! Static product catalog loaded from a JSON document at startup.
//!
//! The document holds the embroidery patterns, their categories and the
//! published customer reviews:
//!
//! ```json
//! {
//!   "products":   [{ "id": "1", "name": "...", "price": { "amount": 450 }, ... }],
//!   "categories": [{ "id": "flowers", "name": "Flowers" }],
//!   "reviews":    [{ "id": "r1", "productName": "...", "rating": 5, ... }]
//! }
//! ```

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use amarine_core::{Category, CategoryId, CurrencyCode, Difficulty, Product, ProductId, Review};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {product} uses {found}, catalog currency is {expected}")]
    MixedCurrency {
        product: ProductId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("product {product} references unknown category {category}")]
    UnknownCategory {
        product: ProductId,
        category: CategoryId,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    reviews: Vec<Review>,
}

/// Product ordering for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Highest numeric id first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Filters for a product listing. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against name and description.
    pub text: Option<String>,
    pub difficulties: Vec<Difficulty>,
    pub categories: Vec<CategoryId>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    /// Number of active filters, counting a search text as one.
    #[must_use]
    pub fn active_filters(&self) -> usize {
        self.difficulties.len()
            + self.categories.len()
            + usize::from(self.text.as_deref().is_some_and(|t| !t.trim().is_empty()))
    }

    fn matches(&self, product: &Product) -> bool {
        let text_match = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .is_none_or(|text| {
                let needle = text.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            });
        let difficulty_match =
            self.difficulties.is_empty() || self.difficulties.contains(&product.difficulty);
        let category_match =
            self.categories.is_empty() || self.categories.contains(&product.category);

        text_match && difficulty_match && category_match
    }
}

/// The loaded catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    categories: Vec<Category>,
    reviews: Vec<Review>,
    currency: CurrencyCode,
}

impl Catalog {
    /// Load and validate the catalog file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation (see [`Catalog::from_json`]).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            products = catalog.len(),
            categories = catalog.categories().len(),
            reviews = catalog.inner.reviews.len(),
            "Catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, product ids repeat, a
    /// price is negative, prices use more than one currency, or a product
    /// references a category that is not listed (when categories are given).
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_parts(document.products, document.categories, document.reviews)
    }

    /// Build a catalog from already-parsed parts, with the same validation
    /// as [`Catalog::from_json`].
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_json`].
    pub fn from_parts(
        products: Vec<Product>,
        categories: Vec<Category>,
        reviews: Vec<Review>,
    ) -> Result<Self, CatalogError> {
        let currency = products
            .first()
            .map_or_else(CurrencyCode::default, |p| p.price.currency_code);
        let known_categories: HashSet<&CategoryId> = categories.iter().map(|c| &c.id).collect();

        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
            if product.price.currency_code != currency {
                return Err(CatalogError::MixedCurrency {
                    product: product.id.clone(),
                    expected: currency.code(),
                    found: product.price.currency_code.code(),
                });
            }
            if !known_categories.is_empty() && !known_categories.contains(&product.category) {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
        }

        Ok(Self {
            inner: Arc::new(CatalogInner {
                products,
                index,
                categories,
                reviews,
                currency,
            }),
        })
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.products.is_empty()
    }

    /// Currency every price in the catalog is quoted in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.inner
            .index
            .get(id)
            .and_then(|&i| self.inner.products.get(i))
    }

    /// All products in document order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.inner.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.inner.categories
    }

    /// Products matching `query`, sorted as requested.
    #[must_use]
    pub fn search(&self, query: &CatalogQuery) -> Vec<&Product> {
        let mut found: Vec<&Product> = self
            .inner
            .products
            .iter()
            .filter(|p| query.matches(p))
            .collect();

        match query.sort {
            SortOrder::PriceAsc => found.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            SortOrder::PriceDesc => found.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            // Non-numeric ids have no age; they go last.
            SortOrder::Newest => found.sort_by_key(|p| Reverse(p.id.numeric())),
        }
        found
    }

    /// Up to [`RELATED_LIMIT`] other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product) -> Vec<&Product> {
        self.inner
            .products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(RELATED_LIMIT)
            .collect()
    }

    /// Published reviews of `product`.
    #[must_use]
    pub fn reviews_for(&self, product: &Product) -> Vec<&Review> {
        self.inner
            .reviews
            .iter()
            .filter(|r| r.product_name == product.name)
            .collect()
    }
}

/// Mean rating with one decimal, `"0.0"` when there are no reviews.
#[must_use]
pub fn average_rating(reviews: &[&Review]) -> String {
    if reviews.is_empty() {
        return "0.0".to_string();
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)] // review counts are tiny
    let mean = f64::from(sum) / reviews.len() as f64;
    format!("{mean:.1}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "products": [
            {"id": "1", "name": "Rose Garden", "description": "Climbing roses", "price": {"amount": 450}, "category": "flowers", "difficulty": "beginner"},
            {"id": "2", "name": "Lavender Field", "description": "Purple rows", "price": {"amount": 750}, "category": "flowers", "difficulty": "advanced"},
            {"id": "3", "name": "Winter Fox", "description": "A fox in the snow", "price": {"amount": 600}, "category": "animals", "difficulty": "intermediate"},
            {"id": "10", "name": "Peony", "description": "Soft pink petals", "price": {"amount": 300}, "category": "flowers", "difficulty": "beginner"}
        ],
        "categories": [
            {"id": "flowers", "name": "Flowers"},
            {"id": "animals", "name": "Animals"}
        ],
        "reviews": [
            {"id": "r1", "author": "Anna", "rating": 5, "text": "Beautiful", "productName": "Rose Garden", "date": "2024-01-10"},
            {"id": "r2", "author": "Olga", "rating": 4, "text": "Nice", "productName": "Rose Garden", "date": "2024-02-11"}
        ]
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_json(DOCUMENT).unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.product("3").map(|p| p.name.as_str()), Some("Winter Fox"));
        assert!(catalog.product("404").is_none());
    }

    #[test]
    fn test_default_listing_is_newest_first() {
        let catalog = catalog();
        let found = catalog.search(&CatalogQuery::default());
        assert_eq!(ids(&found), ["10", "3", "2", "1"]);
    }

    #[test]
    fn test_sort_by_price() {
        let catalog = catalog();
        let asc = catalog.search(&CatalogQuery {
            sort: SortOrder::PriceAsc,
            ..CatalogQuery::default()
        });
        assert_eq!(ids(&asc), ["10", "1", "3", "2"]);

        let desc = catalog.search(&CatalogQuery {
            sort: SortOrder::PriceDesc,
            ..CatalogQuery::default()
        });
        assert_eq!(ids(&desc), ["2", "3", "1", "10"]);
    }

    #[test]
    fn test_text_search_matches_name_and_description() {
        let catalog = catalog();
        let by_name = catalog.search(&CatalogQuery {
            text: Some("ROSE".to_string()),
            ..CatalogQuery::default()
        });
        assert_eq!(ids(&by_name), ["1"]);

        let by_description = catalog.search(&CatalogQuery {
            text: Some("snow".to_string()),
            ..CatalogQuery::default()
        });
        assert_eq!(ids(&by_description), ["3"]);
    }

    #[test]
    fn test_filters_combine() {
        let catalog = catalog();
        let query = CatalogQuery {
            difficulties: vec![Difficulty::Beginner],
            categories: vec![CategoryId::from("flowers")],
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&catalog.search(&query)), ["10", "1"]);
        assert_eq!(query.active_filters(), 2);
    }

    #[test]
    fn test_blank_text_is_not_a_filter() {
        let query = CatalogQuery {
            text: Some("   ".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.active_filters(), 0);
        assert_eq!(catalog().search(&query).len(), 4);
    }

    #[test]
    fn test_related_excludes_self_and_other_categories() {
        let catalog = catalog();
        let rose = catalog.product("1").unwrap();
        assert_eq!(ids(&catalog.related(rose)), ["2", "10"]);
        let fox = catalog.product("3").unwrap();
        assert!(catalog.related(fox).is_empty());
    }

    #[test]
    fn test_reviews_and_rating() {
        let catalog = catalog();
        let rose = catalog.product("1").unwrap();
        let reviews = catalog.reviews_for(rose);
        assert_eq!(reviews.len(), 2);
        assert_eq!(average_rating(&reviews), "4.5");

        let fox = catalog.product("3").unwrap();
        assert_eq!(average_rating(&catalog.reviews_for(fox)), "0.0");
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = r#"{"products": [
            {"id": "1", "name": "A", "price": {"amount": 1}},
            {"id": "1", "name": "B", "price": {"amount": 2}}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let raw = r#"{"products": [{"id": "1", "name": "A", "price": {"amount": -5}}]}"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_rejects_mixed_currency() {
        let raw = r#"{"products": [
            {"id": "1", "name": "A", "price": {"amount": 1}},
            {"id": "2", "name": "B", "price": {"amount": 2, "currency_code": "EUR"}}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::MixedCurrency { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let raw = r#"{
            "products": [{"id": "1", "name": "A", "price": {"amount": 1}, "category": "ships"}],
            "categories": [{"id": "flowers", "name": "Flowers"}]
        }"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog = Catalog::from_json(include_str!("../data/catalog.json")).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.currency(), CurrencyCode::RUB);
        for product in catalog.products() {
            assert!(catalog.related(product).len() <= RELATED_LIMIT);
        }
    }

    #[test]
    fn test_sort_order_serde_names() {
        let parsed: SortOrder = serde_json::from_str("\"price-desc\"").unwrap();
        assert_eq!(parsed, SortOrder::PriceDesc);
    }
}
