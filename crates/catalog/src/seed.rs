//! Bundled sample dataset.
//!
//! Embedded at compile time so a fresh install (or a store whose persisted
//! data turned out to be corrupt) always has something to show.

use crate::error::Result;
use crate::types::*;
use serde::de::DeserializeOwned;

const REVIEWS_JSON: &str = include_str!("../seed/reviews.json");
const SHOP_REVIEWS_JSON: &str = include_str!("../seed/shop_reviews.json");
const OFFERS_JSON: &str = include_str!("../seed/offers.json");
const SHOPS_JSON: &str = include_str!("../seed/shops.json");

fn parse<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(raw)?)
}

/// Seed item reviews, newest first
pub fn reviews() -> Result<Vec<Review>> {
    parse(REVIEWS_JSON)
}

/// Seed shop reviews, newest first
pub fn shop_reviews() -> Result<Vec<ShopReview>> {
    parse(SHOP_REVIEWS_JSON)
}

pub fn offers() -> Result<Vec<Offer>> {
    parse(OFFERS_JSON)
}

pub fn shops() -> Result<Vec<Shop>> {
    parse(SHOPS_JSON)
}
