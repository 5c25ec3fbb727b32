//! Aggregation and filter/sort pipeline for marketplace listings.
//!
//! This crate provides:
//! - Filter and Comparator traits plus the concrete filters
//! - FilterPipeline for composing them
//! - Criteria types that build a pipeline per listing
//! - Rating aggregation (overall, per aspect, per subject)
//! - Pagination of the ordered views
//!
//! ## Architecture
//! A listing query runs in stages:
//! 1. Stats are computed over the full subject collection
//! 2. Filters narrow the collection (logical AND)
//! 3. The comparator orders the survivors (stable)
//! 4. The view is cut into pages
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{compute_stats, paginate, PageRequest, ReviewCriteria, ReviewSort};
//!
//! let reviews = store.list_by_subject("offer-1");
//! let stats = compute_stats(&reviews);
//!
//! let criteria = ReviewCriteria {
//!     rating_equals: Some(5),
//!     sort_key: Some(ReviewSort::MostHelpful),
//!     ..Default::default()
//! };
//! let page = paginate(criteria.apply(&reviews), PageRequest::default());
//! ```

pub mod criteria;
pub mod filter_pipeline;
pub mod filters;
pub mod paginate;
pub mod sort;
pub mod stats;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use criteria::{OfferCriteria, ReviewCriteria, ShopCriteria, ShopReviewCriteria};
pub use filter_pipeline::FilterPipeline;
pub use paginate::{DEFAULT_PER_PAGE, Page, PageRequest, paginate};
pub use sort::{OfferSort, ReviewSort, ShopSort, SortKey};
pub use stats::{
    RatingStats, ShopRatingStats, compute_shop_stats, compute_stats, shop_stats_by_subject,
    stats_by_subject,
};
pub use traits::{Comparator, Filter};
