//! # Review Board
//!
//! The board is the single entry point the storefront talks to. It owns:
//! 1. The item review store
//! 2. The shop review store
//! 3. The offer and shop catalogue
//!
//! Every listing query follows the same steps:
//! 1. Snapshot the subject's collection
//! 2. Aggregate stats over the unfiltered snapshot
//! 3. Run the criteria pipeline (filters, then sort)
//! 4. Cut the requested page
//!
//! Storage is injected at construction; there is no global store.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use catalog::{
    CatalogError, KeyValueStorage, Offer, Review, ReviewDraft, ReviewStore, Shop, ShopReview,
    ShopReviewDraft, seed,
};
use pipeline::{
    OfferCriteria, Page, PageRequest, RatingStats, ReviewCriteria, ShopCriteria,
    ShopRatingStats, ShopReviewCriteria, compute_shop_stats, compute_stats, paginate,
    shop_stats_by_subject,
};

/// Stats for a subject plus one page of its filtered reviews
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListing<R, St> {
    pub stats: St,
    pub page: Page<R>,
}

/// A shop as shown in the directory, with its aggregated review stats
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    #[serde(flatten)]
    pub shop: Shop,
    pub stats: ShopRatingStats,
}

/// Coordinates review stores and the catalogue behind one storage backend
pub struct ReviewBoard<S> {
    reviews: ReviewStore<Review, S>,
    shop_reviews: ReviewStore<ShopReview, S>,
    offers: Vec<Offer>,
    shops: Vec<Shop>,
}

impl<S: KeyValueStorage> ReviewBoard<S> {
    /// Load both review collections from `storage` and the bundled catalogue.
    pub fn open(storage: Arc<S>) -> Result<Self> {
        let reviews: ReviewStore<Review, S> =
            ReviewStore::load(storage.clone()).context("Failed to load item reviews")?;
        let shop_reviews: ReviewStore<ShopReview, S> =
            ReviewStore::load(storage).context("Failed to load shop reviews")?;
        let offers = seed::offers().context("Failed to load offers")?;
        let shops = seed::shops().context("Failed to load shops")?;

        info!(
            "Review board ready: {} reviews, {} shop reviews, {} offers, {} shops",
            reviews.len(),
            shop_reviews.len(),
            offers.len(),
            shops.len()
        );

        Ok(Self {
            reviews,
            shop_reviews,
            offers,
            shops,
        })
    }

    pub fn offer(&self, offer_id: &str) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id == offer_id)
    }

    pub fn shop(&self, shop_id: &str) -> Option<&Shop> {
        self.shops.iter().find(|shop| shop.id == shop_id)
    }

    /// Stats and one page of reviews for an offer
    #[instrument(skip(self, criteria))]
    pub fn item_reviews(
        &self,
        offer_id: &str,
        criteria: &ReviewCriteria,
        page: PageRequest,
    ) -> Result<ReviewListing<Review, RatingStats>> {
        self.require_offer(offer_id)?;

        let reviews = self.reviews.list_by_subject(offer_id);
        let stats = compute_stats(&reviews);
        let view = criteria.apply(&reviews);

        Ok(ReviewListing {
            stats,
            page: paginate(view, page),
        })
    }

    /// Stats and one page of reviews for a shop
    #[instrument(skip(self, criteria))]
    pub fn shop_reviews(
        &self,
        shop_id: &str,
        criteria: &ShopReviewCriteria,
        page: PageRequest,
    ) -> Result<ReviewListing<ShopReview, ShopRatingStats>> {
        self.require_shop(shop_id)?;

        let reviews = self.shop_reviews.list_by_subject(shop_id);
        let stats = compute_shop_stats(&reviews);
        let view = criteria.apply(&reviews);

        Ok(ReviewListing {
            stats,
            page: paginate(view, page),
        })
    }

    /// Validate, stamp and store an item review
    #[instrument(skip(self, draft), fields(offer_id = %draft.subject_id))]
    pub fn submit_review(&mut self, draft: ReviewDraft) -> Result<Review> {
        self.require_offer(&draft.subject_id)?;

        let review = draft.into_review(Utc::now()).map_err(CatalogError::from)?;
        self.reviews
            .append(review.clone())
            .context("Failed to persist item reviews")?;

        info!("Stored review {}", review.id);
        Ok(review)
    }

    /// Validate, stamp and store a shop review
    #[instrument(skip(self, draft), fields(shop_id = %draft.review.subject_id))]
    pub fn submit_shop_review(&mut self, draft: ShopReviewDraft) -> Result<ShopReview> {
        self.require_shop(&draft.review.subject_id)?;

        let review = draft
            .into_shop_review(Utc::now())
            .map_err(CatalogError::from)?;
        self.shop_reviews
            .append(review.clone())
            .context("Failed to persist shop reviews")?;

        info!("Stored shop review {}", review.review.id);
        Ok(review)
    }

    /// Add a helpful vote to a review of either kind.
    ///
    /// Returns `false` when no review has that id.
    #[instrument(skip(self))]
    pub fn mark_helpful(&mut self, review_id: &str) -> Result<bool> {
        if self.reviews.increment_helpful(review_id)? {
            return Ok(true);
        }
        Ok(self.shop_reviews.increment_helpful(review_id)?)
    }

    /// One page of the offer catalogue
    #[instrument(skip(self, criteria))]
    pub fn offers(&self, criteria: &OfferCriteria, page: PageRequest) -> Page<Offer> {
        paginate(criteria.apply(&self.offers), page)
    }

    /// One page of the shop directory, each shop with its review stats
    #[instrument(skip(self, criteria))]
    pub fn shops(&self, criteria: &ShopCriteria, page: PageRequest) -> Page<ShopSummary> {
        let mut stats = shop_stats_by_subject(self.shop_reviews.all());

        paginate(criteria.apply(&self.shops), page).map(|shop| {
            let stats = stats.remove(&shop.id).unwrap_or_default();
            ShopSummary { shop, stats }
        })
    }

    /// Drop all persisted reviews and go back to the seed data
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<()> {
        self.reviews.reset().context("Failed to reset item reviews")?;
        self.shop_reviews
            .reset()
            .context("Failed to reset shop reviews")?;
        Ok(())
    }

    fn require_offer(&self, offer_id: &str) -> Result<()> {
        if self.offer(offer_id).is_none() {
            return Err(unknown("offer", offer_id).into());
        }
        Ok(())
    }

    fn require_shop(&self, shop_id: &str) -> Result<()> {
        if self.shop(shop_id).is_none() {
            return Err(unknown("shop", shop_id).into());
        }
        Ok(())
    }
}

fn unknown(entity: &str, id: &str) -> CatalogError {
    CatalogError::UnknownSubject {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}
