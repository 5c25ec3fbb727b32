//! Filters for the offer and shop listings.
//!
//! Some predicates (category, rating floor, text search) apply to both
//! kinds; those structs implement `Filter` once per kind.

use crate::traits::Filter;
use catalog::{Offer, Shop};

/// Keeps items in one category (case-insensitive).
pub struct CategoryEquals(String);

impl CategoryEquals {
    pub fn new(category: impl Into<String>) -> Self {
        Self(category.into())
    }
}

impl Filter<Offer> for CategoryEquals {
    fn name(&self) -> &str {
        "CategoryEquals"
    }

    fn keep(&self, offer: &Offer) -> bool {
        offer.category.eq_ignore_ascii_case(&self.0)
    }
}

impl Filter<Shop> for CategoryEquals {
    fn name(&self) -> &str {
        "CategoryEquals"
    }

    fn keep(&self, shop: &Shop) -> bool {
        shop.category.eq_ignore_ascii_case(&self.0)
    }
}

/// Keeps items whose display rating is at least the threshold.
pub struct MinimumRating(pub f64);

impl Filter<Offer> for MinimumRating {
    fn name(&self) -> &str {
        "MinimumRating"
    }

    fn keep(&self, offer: &Offer) -> bool {
        offer.rating >= self.0
    }
}

impl Filter<Shop> for MinimumRating {
    fn name(&self) -> &str {
        "MinimumRating"
    }

    fn keep(&self, shop: &Shop) -> bool {
        shop.rating >= self.0
    }
}

/// Case-insensitive substring match on the visible text of an item.
pub struct TextSearch {
    needle: String,
}

impl TextSearch {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    fn matches(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl Filter<Offer> for TextSearch {
    fn name(&self) -> &str {
        "TextSearch"
    }

    fn keep(&self, offer: &Offer) -> bool {
        self.matches(&[offer.title.as_str(), offer.description.as_str()])
    }
}

impl Filter<Shop> for TextSearch {
    fn name(&self) -> &str {
        "TextSearch"
    }

    fn keep(&self, shop: &Shop) -> bool {
        self.matches(&[shop.name.as_str(), shop.description.as_str()])
    }
}

/// Keeps offers sold by one shop.
pub struct SoldBy(String);

impl SoldBy {
    pub fn new(shop_id: impl Into<String>) -> Self {
        Self(shop_id.into())
    }
}

impl Filter<Offer> for SoldBy {
    fn name(&self) -> &str {
        "SoldBy"
    }

    fn keep(&self, offer: &Offer) -> bool {
        offer.shop_id == self.0
    }
}

/// Keeps offers priced within an inclusive range. Either bound may be open.
pub struct PriceRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Filter<Offer> for PriceRange {
    fn name(&self) -> &str {
        "PriceRange"
    }

    fn keep(&self, offer: &Offer) -> bool {
        self.min.is_none_or(|min| offer.price >= min)
            && self.max.is_none_or(|max| offer.price <= max)
    }
}

pub struct InStock;

impl Filter<Offer> for InStock {
    fn name(&self) -> &str {
        "InStock"
    }

    fn keep(&self, offer: &Offer) -> bool {
        offer.in_stock()
    }
}

pub struct VerifiedShop;

impl Filter<Shop> for VerifiedShop {
    fn name(&self) -> &str {
        "VerifiedShop"
    }

    fn keep(&self, shop: &Shop) -> bool {
        shop.verified
    }
}
