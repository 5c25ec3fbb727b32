//! Filters that only make sense for shop reviews.

use crate::traits::Filter;
use catalog::{Aspect, ShopReview};

/// Keeps reviews linked to an order the shop fulfilled.
pub struct OrderVerified;

impl Filter<ShopReview> for OrderVerified {
    fn name(&self) -> &str {
        "OrderVerified"
    }

    fn keep(&self, review: &ShopReview) -> bool {
        review.order_verified
    }
}

/// Keeps reviews whose recommendation flag matches.
pub struct RecommendationEquals(pub bool);

impl Filter<ShopReview> for RecommendationEquals {
    fn name(&self) -> &str {
        "RecommendationEquals"
    }

    fn keep(&self, review: &ShopReview) -> bool {
        review.recommendation == self.0
    }
}

/// Keeps reviews that rated the given aspect.
pub struct AspectPresent(pub Aspect);

impl Filter<ShopReview> for AspectPresent {
    fn name(&self) -> &str {
        "AspectPresent"
    }

    fn keep(&self, review: &ShopReview) -> bool {
        review.aspects.is_rated(self.0)
    }
}
