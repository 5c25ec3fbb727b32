//! Filter implementations for the listing pipelines.
//!
//! This module contains all the concrete filters that can be composed
//! into a FilterPipeline.

pub mod listing;
pub mod review;
pub mod shop_review;

// Re-export for convenience
pub use listing::{
    CategoryEquals, InStock, MinimumRating, PriceRange, SoldBy, TextSearch, VerifiedShop,
};
pub use review::{HasPhotos, RatingEquals, VerifiedPurchase};
pub use shop_review::{AspectPresent, OrderVerified, RecommendationEquals};
