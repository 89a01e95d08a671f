//! Customer review submission.
//!
//! Reviews are moderated by hand, so accepted submissions are acknowledged
//! but never published or stored by the storefront.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum author name length after trimming, in characters.
pub const MIN_AUTHOR_LEN: usize = 2;

/// Minimum review text length after trimming, in characters.
pub const MIN_TEXT_LEN: usize = 10;

/// Acknowledgement shown after a review is accepted.
pub const REVIEW_ACCEPTED: &str = "Thanks for your review! It will appear after moderation.";

/// Errors that reject a review submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Name must be at least {} characters", MIN_AUTHOR_LEN)]
    AuthorTooShort,
    #[error("Review must be at least {} characters", MIN_TEXT_LEN)]
    TextTooShort,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
}

/// Review form as submitted by the customer.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
    pub author: String,
    pub rating: u8,
    pub text: String,
}

/// A review that passed validation, with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedReview {
    pub author: String,
    pub rating: u8,
    pub text: String,
}

impl ReviewSubmission {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the author or text is too short or the rating is
    /// not between 1 and 5.
    pub fn validate(&self) -> Result<AcceptedReview, ReviewError> {
        let author = self.author.trim();
        let text = self.text.trim();

        if author.chars().count() < MIN_AUTHOR_LEN {
            return Err(ReviewError::AuthorTooShort);
        }
        if text.chars().count() < MIN_TEXT_LEN {
            return Err(ReviewError::TextTooShort);
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange);
        }

        Ok(AcceptedReview {
            author: author.to_owned(),
            rating: self.rating,
            text: text.to_owned(),
        })
    }
}
