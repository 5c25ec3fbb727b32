//! Sort keys for every listing and the comparators behind them.
//!
//! Each listing has a closed set of keys. Parsing comes in two flavours:
//! - `FromStr` is strict and rejects unknown keys
//! - `SortKey::parse_lenient` logs unknown keys and uses the default,
//!   matching how the storefront treats a stale key in a shared URL

use crate::traits::Comparator;
use anyhow::{Result, anyhow};
use catalog::{Offer, ReviewRecord, Shop};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::warn;

/// Shared behaviour of the sort key enums.
pub trait SortKey: Copy + Default + Debug + FromStr<Err = anyhow::Error> + 'static {
    /// Every key, in the order they are offered to the user
    const ALL: &'static [Self];

    /// The canonical spelling (camelCase, as stored in criteria)
    fn as_str(&self) -> &'static str;

    /// Parse `raw`, falling back to the default key when it isn't known.
    fn parse_lenient(raw: &str) -> Self {
        match raw.parse() {
            Ok(key) => key,
            Err(e) => {
                let fallback = Self::default();
                warn!("{}, sorting by {}", e, fallback.as_str());
                fallback
            }
        }
    }
}

/// Lowercase and drop separators so "rating-high", "rating_high" and
/// "ratingHigh" all match.
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_key<K: SortKey>(raw: &str, listing: &str) -> Result<K> {
    let wanted = normalize(raw);
    K::ALL
        .iter()
        .copied()
        .find(|key| normalize(key.as_str()) == wanted)
        .ok_or_else(|| anyhow!("Unknown {} sort key '{}'", listing, raw))
}

// =============================================================================
// Reviews
// =============================================================================

/// Orderings offered on review lists (item and shop reviews alike)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    RatingHigh,
    RatingLow,
    MostHelpful,
}

impl SortKey for ReviewSort {
    const ALL: &'static [Self] = &[
        ReviewSort::Newest,
        ReviewSort::Oldest,
        ReviewSort::RatingHigh,
        ReviewSort::RatingLow,
        ReviewSort::MostHelpful,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
            ReviewSort::Oldest => "oldest",
            ReviewSort::RatingHigh => "ratingHigh",
            ReviewSort::RatingLow => "ratingLow",
            ReviewSort::MostHelpful => "mostHelpful",
        }
    }
}

impl FromStr for ReviewSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_key(s, "review")
    }
}

impl<R: ReviewRecord> Comparator<R> for ReviewSort {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn compare(&self, a: &R, b: &R) -> Ordering {
        match self {
            ReviewSort::Newest => b.created_at().cmp(&a.created_at()),
            ReviewSort::Oldest => a.created_at().cmp(&b.created_at()),
            ReviewSort::RatingHigh => b.rating().cmp(&a.rating()),
            ReviewSort::RatingLow => a.rating().cmp(&b.rating()),
            ReviewSort::MostHelpful => b.helpful_count().cmp(&a.helpful_count()),
        }
    }
}

// =============================================================================
// Offers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferSort {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    /// Highest display rating first
    Rating,
    /// Most reviewed first
    Popular,
}

impl SortKey for OfferSort {
    const ALL: &'static [Self] = &[
        OfferSort::Newest,
        OfferSort::PriceLow,
        OfferSort::PriceHigh,
        OfferSort::Rating,
        OfferSort::Popular,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            OfferSort::Newest => "newest",
            OfferSort::PriceLow => "priceLow",
            OfferSort::PriceHigh => "priceHigh",
            OfferSort::Rating => "rating",
            OfferSort::Popular => "popular",
        }
    }
}

impl FromStr for OfferSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_key(s, "offer")
    }
}

impl Comparator<Offer> for OfferSort {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn compare(&self, a: &Offer, b: &Offer) -> Ordering {
        match self {
            OfferSort::Newest => b.created_at.cmp(&a.created_at),
            OfferSort::PriceLow => a.price.cmp(&b.price),
            OfferSort::PriceHigh => b.price.cmp(&a.price),
            OfferSort::Rating => b.rating.total_cmp(&a.rating),
            OfferSort::Popular => b.review_count.cmp(&a.review_count),
        }
    }
}

// =============================================================================
// Shops
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShopSort {
    #[default]
    Rating,
    Reviews,
    Newest,
    /// Alphabetical, ignoring case
    Name,
}

impl SortKey for ShopSort {
    const ALL: &'static [Self] = &[
        ShopSort::Rating,
        ShopSort::Reviews,
        ShopSort::Newest,
        ShopSort::Name,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ShopSort::Rating => "rating",
            ShopSort::Reviews => "reviews",
            ShopSort::Newest => "newest",
            ShopSort::Name => "name",
        }
    }
}

impl FromStr for ShopSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_key(s, "shop")
    }
}

impl Comparator<Shop> for ShopSort {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn compare(&self, a: &Shop, b: &Shop) -> Ordering {
        match self {
            ShopSort::Rating => b.rating.total_cmp(&a.rating),
            ShopSort::Reviews => b.review_count.cmp(&a.review_count),
            ShopSort::Newest => b.created_at.cmp(&a.created_at),
            ShopSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}
