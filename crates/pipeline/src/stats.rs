//! Rating aggregation over review collections.
//!
//! All functions are pure: they borrow reviews and return fresh stats.
//! Empty input is not an error; it yields the all-zero stats.

use catalog::{Aspect, MAX_RATING, MIN_RATING, ReviewRecord, ShopReview};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Summary of a set of star ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_count: u32,
    /// Unrounded mean, 0 for an empty set
    pub average_rating: f64,
    /// `distribution[r - 1]` counts the reviews rated `r`
    pub distribution: [u32; 5],
}

impl RatingStats {
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            average_rating: 0.0,
            distribution: [0; 5],
        }
    }

    /// Number of reviews with exactly `rating` stars (0 outside 1..=5)
    pub fn count_for(&self, rating: u8) -> u32 {
        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            self.distribution[usize::from(rating - MIN_RATING)]
        } else {
            0
        }
    }
}

impl Default for RatingStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Stats for shop reviews: the overall rating summary plus aspect averages
/// and how many reviewers recommend the shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRatingStats {
    #[serde(flatten)]
    pub overall: RatingStats,
    /// Every aspect is present; 0 when no review rated it
    pub aspect_averages: BTreeMap<Aspect, f64>,
    /// 0..=100
    pub recommendation_percentage: f64,
}

impl ShopRatingStats {
    pub fn empty() -> Self {
        Self {
            overall: RatingStats::empty(),
            aspect_averages: Aspect::ALL.into_iter().map(|aspect| (aspect, 0.0)).collect(),
            recommendation_percentage: 0.0,
        }
    }

    pub fn aspect_average(&self, aspect: Aspect) -> f64 {
        self.aspect_averages.get(&aspect).copied().unwrap_or(0.0)
    }
}

impl Default for ShopRatingStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compute the rating summary of any review kind.
pub fn compute_stats<'a, R>(reviews: impl IntoIterator<Item = &'a R>) -> RatingStats
where
    R: ReviewRecord + 'a,
{
    let mut stats = RatingStats::empty();
    let mut sum: u64 = 0;

    for review in reviews {
        let rating = review.rating();
        stats.total_count += 1;
        sum += u64::from(rating);

        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            stats.distribution[usize::from(rating - MIN_RATING)] += 1;
        } else {
            warn!(
                "Review {} has rating {} outside {}..={}, left out of the histogram",
                review.id(),
                rating,
                MIN_RATING,
                MAX_RATING
            );
        }
    }

    if stats.total_count > 0 {
        stats.average_rating = sum as f64 / f64::from(stats.total_count);
    }
    stats
}

/// Compute the rating summary, aspect averages and recommendation share of
/// a set of shop reviews.
///
/// An aspect's average only counts the reviews that rated it.
pub fn compute_shop_stats<'a>(
    reviews: impl IntoIterator<Item = &'a ShopReview>,
) -> ShopRatingStats {
    let reviews: Vec<&ShopReview> = reviews.into_iter().collect();
    let mut stats = ShopRatingStats::empty();
    stats.overall = compute_stats(reviews.iter().copied());

    if stats.overall.total_count == 0 {
        return stats;
    }

    // aspect -> (sum, rated count)
    let mut totals: BTreeMap<Aspect, (u32, u32)> = BTreeMap::new();
    let mut recommended = 0u32;

    for review in &reviews {
        for (aspect, score) in review.aspects.iter() {
            let entry = totals.entry(aspect).or_insert((0, 0));
            entry.0 += u32::from(score);
            entry.1 += 1;
        }
        if review.recommendation {
            recommended += 1;
        }
    }

    for (aspect, (sum, count)) in totals {
        stats
            .aspect_averages
            .insert(aspect, f64::from(sum) / f64::from(count));
    }
    stats.recommendation_percentage =
        100.0 * f64::from(recommended) / f64::from(stats.overall.total_count);

    stats
}

fn group_by_subject<R: ReviewRecord>(reviews: &[R]) -> HashMap<&str, Vec<&R>> {
    let mut groups: HashMap<&str, Vec<&R>> = HashMap::new();
    for review in reviews {
        groups.entry(review.subject_id()).or_default().push(review);
    }
    groups
}

/// Rating summary for every subject that appears in `reviews`.
///
/// ## Performance Note
/// Groups are aggregated in parallel with Rayon.
pub fn stats_by_subject<R>(reviews: &[R]) -> HashMap<String, RatingStats>
where
    R: ReviewRecord + Sync,
{
    group_by_subject(reviews)
        .into_par_iter()
        .map(|(subject, group)| (subject.to_string(), compute_stats(group)))
        .collect()
}

/// Shop stats for every shop that appears in `reviews`.
pub fn shop_stats_by_subject(reviews: &[ShopReview]) -> HashMap<String, ShopRatingStats> {
    group_by_subject(reviews)
        .into_par_iter()
        .map(|(subject, group)| (subject.to_string(), compute_shop_stats(group)))
        .collect()
}
