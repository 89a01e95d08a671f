//! Catalog entities: embroidery patterns, categories and customer reviews.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, ReviewId};
use super::price::Price;

/// An embroidery pattern offered in the catalog.
///
/// Products are supplied by the catalog and never mutated by the shop; the
/// cart stores a full copy so it can render and total itself without the
/// catalog at hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_category")]
    pub category: CategoryId,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Finished size, e.g. "20x25 cm".
    #[serde(default)]
    pub size: String,
    /// Number of thread colours used by the pattern.
    #[serde(default)]
    pub colors: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_category() -> CategoryId {
    CategoryId::from("uncategorized")
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Create a product with only the fields the shop relies on.
    ///
    /// Descriptive fields take their defaults.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
            category: default_category(),
            difficulty: Difficulty::default(),
            size: String::new(),
            colors: 0,
            badge: None,
            in_stock: true,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Skill level a pattern is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Stable lowercase name, as used in query strings and data files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown difficulty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Marketing badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    New,
    Bestseller,
    /// Pattern for an upcoming stitch-along project.
    SoComing,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

/// A published customer review.
///
/// Reviews reference products by display name, the way the shop's review
/// data is authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub rating: u8,
    pub text: String,
    pub product_name: String,
    pub date: NaiveDate,
}
