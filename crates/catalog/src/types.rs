//! Core domain types for the marketplace.
//!
//! Everything here mirrors the JSON shape the storefront keeps in local
//! storage (camelCase field names), so persisted collections and the bundled
//! seed files decode straight into these structs.

use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a review or shop review
pub type ReviewId = String;

/// Identifier of whatever a review is about (an offer or a shop)
pub type SubjectId = String;

/// Identifier of a user (weak reference, no ownership)
pub type UserId = String;

pub type OfferId = String;

pub type ShopId = String;

/// Lowest and highest star rating a review can carry
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// =============================================================================
// Reviews
// =============================================================================

/// A photo attached to a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub filename: String,
}

/// An item-level review of an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub subject_id: SubjectId,
    pub author_id: UserId,
    pub author_name: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub helpful_count: u32,
    #[serde(default)]
    pub verified_purchase: bool,
}

/// The fixed set of dimensions a shop is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Service,
    Quality,
    Shipping,
    Communication,
    Value,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Service,
        Aspect::Quality,
        Aspect::Shipping,
        Aspect::Communication,
        Aspect::Value,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Service => "service",
            Aspect::Quality => "quality",
            Aspect::Shipping => "shipping",
            Aspect::Communication => "communication",
            Aspect::Value => "value",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aspect {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aspect::ALL
            .into_iter()
            .find(|aspect| aspect.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::InvalidValue {
                field: "aspect".to_string(),
                value: s.to_string(),
            })
    }
}

/// Per-aspect scores of a shop review.
///
/// An aspect that was not rated is simply absent. On the wire every aspect
/// is written out and 0 stands for "not rated", which is what stored data
/// and the seed files use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Aspect, u8>", into = "BTreeMap<Aspect, u8>")]
pub struct AspectRatings {
    scores: BTreeMap<Aspect, u8>,
}

impl AspectRatings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper, mostly for fixtures
    pub fn with(mut self, aspect: Aspect, score: u8) -> Self {
        self.set(aspect, Some(score));
        self
    }

    /// Score for an aspect, `None` when it wasn't rated
    pub fn get(&self, aspect: Aspect) -> Option<u8> {
        self.scores.get(&aspect).copied()
    }

    /// Set or clear a score. `Some(0)` is treated as clearing it.
    pub fn set(&mut self, aspect: Aspect, score: Option<u8>) {
        match score {
            Some(score) if score > 0 => {
                self.scores.insert(aspect, score);
            }
            _ => {
                self.scores.remove(&aspect);
            }
        }
    }

    pub fn is_rated(&self, aspect: Aspect) -> bool {
        self.scores.contains_key(&aspect)
    }

    pub fn rated_count(&self) -> usize {
        self.scores.len()
    }

    /// Rated aspects in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Aspect, u8)> + '_ {
        self.scores.iter().map(|(aspect, score)| (*aspect, *score))
    }
}

impl From<BTreeMap<Aspect, u8>> for AspectRatings {
    fn from(raw: BTreeMap<Aspect, u8>) -> Self {
        let scores = raw.into_iter().filter(|(_, score)| *score > 0).collect();
        Self { scores }
    }
}

impl From<AspectRatings> for BTreeMap<Aspect, u8> {
    fn from(ratings: AspectRatings) -> Self {
        Aspect::ALL
            .into_iter()
            .map(|aspect| (aspect, ratings.get(aspect).unwrap_or(0)))
            .collect()
    }
}

/// A review of a shop: a regular review plus aspect scores and a
/// recommendation flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopReview {
    #[serde(flatten)]
    pub review: Review,
    #[serde(default)]
    pub aspects: AspectRatings,
    pub recommendation: bool,
    /// Linked to an order the shop actually fulfilled
    #[serde(default)]
    pub order_verified: bool,
}

/// Read access shared by `Review` and `ShopReview`, used by the store,
/// the filters and the aggregator.
pub trait ReviewRecord {
    fn id(&self) -> &str;
    fn subject_id(&self) -> &str;
    fn rating(&self) -> u8;
    fn photos(&self) -> &[Photo];
    fn verified_purchase(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;
    fn helpful_count(&self) -> u32;

    /// Bump the helpful counter by one. Never wraps around.
    fn mark_helpful(&mut self);
}

impl ReviewRecord for Review {
    fn id(&self) -> &str {
        &self.id
    }

    fn subject_id(&self) -> &str {
        &self.subject_id
    }

    fn rating(&self) -> u8 {
        self.rating
    }

    fn photos(&self) -> &[Photo] {
        &self.photos
    }

    fn verified_purchase(&self) -> bool {
        self.verified_purchase
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn helpful_count(&self) -> u32 {
        self.helpful_count
    }

    fn mark_helpful(&mut self) {
        self.helpful_count = self.helpful_count.saturating_add(1);
    }
}

impl ReviewRecord for ShopReview {
    fn id(&self) -> &str {
        self.review.id()
    }

    fn subject_id(&self) -> &str {
        self.review.subject_id()
    }

    fn rating(&self) -> u8 {
        self.review.rating
    }

    fn photos(&self) -> &[Photo] {
        self.review.photos()
    }

    fn verified_purchase(&self) -> bool {
        self.review.verified_purchase
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.review.created_at
    }

    fn helpful_count(&self) -> u32 {
        self.review.helpful_count
    }

    fn mark_helpful(&mut self) {
        self.review.mark_helpful();
    }
}

// =============================================================================
// Offers and Shops
// =============================================================================

/// A listing in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub shop_id: ShopId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Price in minor currency units (cents)
    pub price: u64,
    /// Display rating, 0 to 5
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A seller storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
