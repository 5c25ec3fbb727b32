//! Error types for the catalog crate.
//!
//! Two layers:
//! - `ValidationError` covers a rejected user submission (bad rating, empty
//!   comment, ...). It is surfaced to the user as a blocking message.
//! - `CatalogError` covers everything else: storage I/O, JSON encoding and
//!   lookups that reference unknown entities.

use crate::types::Aspect;
use thiserror::Error;

/// Reasons a review draft is rejected before it reaches a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rating must be a whole star count from 1 to 5
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// Comment is blank after trimming
    #[error("Comment must not be empty")]
    EmptyComment,

    #[error("Comment is {len} characters long, the limit is {max}")]
    CommentTooLong { len: usize, max: usize },

    #[error("A review can carry at most {max} photos, got {count}")]
    TooManyPhotos { count: usize, max: usize },

    /// Shop reviews need at least one aspect score
    #[error("At least one aspect must be rated")]
    NoAspectRated,

    #[error("Aspect {aspect} must be rated between 1 and 5, got {value}")]
    AspectOutOfRange { aspect: Aspect, value: u8 },
}

/// Errors that can occur while loading, storing or querying catalog data
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error while touching the storage backend
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Persisted or bundled JSON could not be encoded/decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A field carried a value outside its domain
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Submission rejected by validation
    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    /// Referenced entity doesn't exist (e.g., review for an unknown offer)
    #[error("Unknown {entity}: {id}")]
    UnknownSubject { entity: String, id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
