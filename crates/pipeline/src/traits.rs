//! Core traits for the filter/sort pipeline.
//!
//! A query over any listing (reviews, shop reviews, offers, shops) is a list
//! of `Filter` predicates combined with AND, followed by one `Comparator`.

use std::cmp::Ordering;

/// One predicate of a listing query.
///
/// ## Design Note
/// - `Send + Sync` allows pipelines to be shared across threads
/// - Filters only look at an item; they never modify it
pub trait Filter<T>: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `item` survives this filter
    fn keep(&self, item: &T) -> bool;
}

/// Ordering applied after filtering.
///
/// Comparators are used with a stable sort, so items that compare equal
/// keep their relative order from the input.
pub trait Comparator<T>: Send + Sync {
    fn name(&self) -> &str;

    fn compare(&self, a: &T, b: &T) -> Ordering;
}
