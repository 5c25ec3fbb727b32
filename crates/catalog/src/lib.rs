//! # Catalog Crate
//!
//! Domain model and review storage for the marketplace.
//!
//! ## Main Components
//!
//! - **types**: Reviews, shop reviews, aspects, offers and shops
//! - **draft**: User submissions and their validation rules
//! - **storage**: Key/value persistence backends (files, memory)
//! - **store**: Per-kind review collections with seed fallback
//! - **seed**: The bundled sample dataset
//! - **error**: Error types
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{FileStorage, Review, ReviewStore};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(FileStorage::new("data"));
//! let mut store: ReviewStore<Review, _> = ReviewStore::load(storage)?;
//!
//! let reviews = store.list_by_subject("offer-1");
//! store.increment_helpful(&reviews[0].id)?;
//! ```

pub mod draft;
pub mod error;
pub mod seed;
pub mod storage;
pub mod store;
pub mod types;

pub use draft::{MAX_COMMENT_LEN, MAX_PHOTOS, ReviewDraft, ShopReviewDraft};
pub use error::{CatalogError, Result, ValidationError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ReviewStore, StoredReview};
pub use types::{
    // Type aliases
    OfferId,
    ReviewId,
    ShopId,
    SubjectId,
    UserId,
    // Core types
    Aspect,
    AspectRatings,
    Offer,
    Photo,
    Review,
    ReviewRecord,
    Shop,
    ShopReview,
    // Constants
    MAX_RATING,
    MIN_RATING,
};
