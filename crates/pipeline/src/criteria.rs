//! Declarative query criteria, one type per listing.
//!
//! A criteria value is what the listing's filter bar produces. `pipeline()`
//! turns it into a `FilterPipeline`: each field that is set contributes one
//! filter, and the sort key (or the listing's default) picks the comparator.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::*;
use crate::sort::{OfferSort, ReviewSort, ShopSort};
use catalog::{Aspect, Offer, ReviewRecord, Shop, ShopId, ShopReview};
use serde::{Deserialize, Serialize};

/// Criteria for a list of item reviews.
///
/// `require_photos` and `require_verified` only constrain when `true`;
/// `false` means "don't care".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewCriteria {
    pub rating_equals: Option<u8>,
    pub require_photos: bool,
    pub require_verified: bool,
    pub sort_key: Option<ReviewSort>,
}

impl ReviewCriteria {
    /// Build the pipeline for any review kind.
    pub fn pipeline<R>(&self) -> FilterPipeline<R>
    where
        R: ReviewRecord + Clone + 'static,
    {
        let mut pipeline = FilterPipeline::new();

        if let Some(rating) = self.rating_equals {
            pipeline = pipeline.add_filter(RatingEquals(rating));
        }
        if self.require_photos {
            pipeline = pipeline.add_filter(HasPhotos);
        }
        if self.require_verified {
            pipeline = pipeline.add_filter(VerifiedPurchase);
        }

        pipeline.sort_by(self.sort_key.unwrap_or_default())
    }

    /// Run the query over `reviews`
    pub fn apply<R>(&self, reviews: &[R]) -> Vec<R>
    where
        R: ReviewRecord + Clone + 'static,
    {
        self.pipeline().apply(reviews)
    }
}

/// Criteria for a list of shop reviews: the item review criteria plus the
/// shop-only predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopReviewCriteria {
    #[serde(flatten)]
    pub review: ReviewCriteria,
    pub require_order_verified: bool,
    pub recommendation_equals: Option<bool>,
    pub aspect_present: Option<Aspect>,
}

impl ShopReviewCriteria {
    pub fn pipeline(&self) -> FilterPipeline<ShopReview> {
        let mut pipeline = self.review.pipeline::<ShopReview>();

        if self.require_order_verified {
            pipeline = pipeline.add_filter(OrderVerified);
        }
        if let Some(recommended) = self.recommendation_equals {
            pipeline = pipeline.add_filter(RecommendationEquals(recommended));
        }
        if let Some(aspect) = self.aspect_present {
            pipeline = pipeline.add_filter(AspectPresent(aspect));
        }
        pipeline
    }

    pub fn apply(&self, reviews: &[ShopReview]) -> Vec<ShopReview> {
        self.pipeline().apply(reviews)
    }
}

/// Criteria for the offer catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferCriteria {
    pub category: Option<String>,
    pub shop_id: Option<ShopId>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_rating: Option<f64>,
    pub in_stock_only: bool,
    /// Blank searches are ignored
    pub search: Option<String>,
    pub sort_key: Option<OfferSort>,
}

impl OfferCriteria {
    pub fn pipeline(&self) -> FilterPipeline<Offer> {
        let mut pipeline = FilterPipeline::new();

        if let Some(category) = &self.category {
            pipeline = pipeline.add_filter(CategoryEquals::new(category.as_str()));
        }
        if let Some(shop_id) = &self.shop_id {
            pipeline = pipeline.add_filter(SoldBy::new(shop_id.as_str()));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            pipeline = pipeline.add_filter(PriceRange {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if let Some(min_rating) = self.min_rating {
            pipeline = pipeline.add_filter(MinimumRating(min_rating));
        }
        if self.in_stock_only {
            pipeline = pipeline.add_filter(InStock);
        }
        if let Some(search) = non_blank(&self.search) {
            pipeline = pipeline.add_filter(TextSearch::new(search));
        }

        pipeline.sort_by(self.sort_key.unwrap_or_default())
    }

    pub fn apply(&self, offers: &[Offer]) -> Vec<Offer> {
        self.pipeline().apply(offers)
    }
}

/// Criteria for the shop directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopCriteria {
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    pub verified_only: bool,
    pub search: Option<String>,
    pub sort_key: Option<ShopSort>,
}

impl ShopCriteria {
    pub fn pipeline(&self) -> FilterPipeline<Shop> {
        let mut pipeline = FilterPipeline::new();

        if let Some(category) = &self.category {
            pipeline = pipeline.add_filter(CategoryEquals::new(category.as_str()));
        }
        if let Some(min_rating) = self.min_rating {
            pipeline = pipeline.add_filter(MinimumRating(min_rating));
        }
        if self.verified_only {
            pipeline = pipeline.add_filter(VerifiedShop);
        }
        if let Some(search) = non_blank(&self.search) {
            pipeline = pipeline.add_filter(TextSearch::new(search));
        }

        pipeline.sort_by(self.sort_key.unwrap_or_default())
    }

    pub fn apply(&self, shops: &[Shop]) -> Vec<Shop> {
        self.pipeline().apply(shops)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
