//! User submissions before they become stored reviews.
//!
//! A draft is what the review form produces. `validate` enforces the form
//! rules; `into_review` additionally stamps a fresh id and timestamps.

use crate::error::ValidationError;
use crate::types::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Longest accepted comment, in characters
pub const MAX_COMMENT_LEN: usize = 1000;

/// Most photos a single review can carry
pub const MAX_PHOTOS: usize = 6;

/// An item review as submitted by a user
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub subject_id: SubjectId,
    pub author_id: UserId,
    pub author_name: String,
    /// 0 means the user never picked a star
    pub rating: u8,
    pub title: Option<String>,
    pub comment: String,
    pub photos: Vec<Photo>,
    pub verified_purchase: bool,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }

        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        let len = comment.chars().count();
        if len > MAX_COMMENT_LEN {
            return Err(ValidationError::CommentTooLong {
                len,
                max: MAX_COMMENT_LEN,
            });
        }

        if self.photos.len() > MAX_PHOTOS {
            return Err(ValidationError::TooManyPhotos {
                count: self.photos.len(),
                max: MAX_PHOTOS,
            });
        }
        Ok(())
    }

    /// Validate and turn the draft into a review created at `now`.
    pub fn into_review(self, now: DateTime<Utc>) -> Result<Review, ValidationError> {
        self.validate()?;
        Ok(self.stamp(format!("review-{}", Uuid::new_v4()), now))
    }

    fn stamp(self, id: ReviewId, now: DateTime<Utc>) -> Review {
        // Blank titles are dropped rather than stored as ""
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Review {
            id,
            subject_id: self.subject_id,
            author_id: self.author_id,
            author_name: self.author_name,
            rating: self.rating,
            title,
            comment: self.comment.trim().to_string(),
            photos: self.photos,
            created_at: now,
            updated_at: now,
            helpful_count: 0,
            verified_purchase: self.verified_purchase,
        }
    }
}

/// A shop review as submitted by a user
#[derive(Debug, Clone, PartialEq)]
pub struct ShopReviewDraft {
    pub review: ReviewDraft,
    pub aspects: AspectRatings,
    pub recommendation: bool,
    pub order_verified: bool,
}

impl ShopReviewDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.review.validate()?;

        if self.aspects.rated_count() == 0 {
            return Err(ValidationError::NoAspectRated);
        }
        if let Some((aspect, value)) = self.aspects.iter().find(|(_, v)| *v > MAX_RATING) {
            return Err(ValidationError::AspectOutOfRange { aspect, value });
        }
        Ok(())
    }

    pub fn into_shop_review(self, now: DateTime<Utc>) -> Result<ShopReview, ValidationError> {
        self.validate()?;
        let review = self
            .review
            .stamp(format!("shop-review-{}", Uuid::new_v4()), now);

        Ok(ShopReview {
            review,
            aspects: self.aspects,
            recommendation: self.recommendation,
            order_verified: self.order_verified,
        })
    }
}
