//! Filters shared by item reviews and shop reviews.
//!
//! Each works on anything implementing `ReviewRecord`, so the same structs
//! back both review listings.

use crate::traits::Filter;
use catalog::ReviewRecord;

/// Keeps reviews with exactly this star rating.
pub struct RatingEquals(pub u8);

impl<R: ReviewRecord> Filter<R> for RatingEquals {
    fn name(&self) -> &str {
        "RatingEquals"
    }

    fn keep(&self, review: &R) -> bool {
        review.rating() == self.0
    }
}

/// Keeps reviews with at least one photo.
pub struct HasPhotos;

impl<R: ReviewRecord> Filter<R> for HasPhotos {
    fn name(&self) -> &str {
        "HasPhotos"
    }

    fn keep(&self, review: &R) -> bool {
        !review.photos().is_empty()
    }
}

/// Keeps reviews tied to a confirmed purchase.
pub struct VerifiedPurchase;

impl<R: ReviewRecord> Filter<R> for VerifiedPurchase {
    fn name(&self) -> &str {
        "VerifiedPurchase"
    }

    fn keep(&self, review: &R) -> bool {
        review.verified_purchase()
    }
}
