//! The FilterPipeline orchestrates filters and the final sort.
//!
//! This module provides the main FilterPipeline struct that chains
//! filters together using the builder pattern.

use crate::traits::{Comparator, Filter};
use tracing::debug;

/// Chains filters and an optional comparator into a query.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(RatingEquals(5))
///     .add_filter(HasPhotos)
///     .sort_by(ReviewSort::MostHelpful);
///
/// let view = pipeline.apply(&reviews);
/// ```
pub struct FilterPipeline<T> {
    filters: Vec<Box<dyn Filter<T>>>,
    comparator: Option<Box<dyn Comparator<T>>>,
}

impl<T> FilterPipeline<T> {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            comparator: None,
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Set the comparator, replacing any previous one.
    pub fn sort_by(mut self, comparator: impl Comparator<T> + 'static) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl<T: Clone> FilterPipeline<T> {
    /// Produce a new ordered view of `items`.
    ///
    /// ## Algorithm
    /// 1. Start with every item (borrowed, the source is never modified)
    /// 2. For each filter in order, keep only the items it accepts
    /// 3. Clone the survivors
    /// 4. Stable-sort them with the comparator, if any
    pub fn apply(&self, items: &[T]) -> Vec<T> {
        let mut current: Vec<&T> = items.iter().collect();

        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current.retain(|item| filter.keep(item));
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }

        let mut view: Vec<T> = current.into_iter().cloned().collect();
        if let Some(comparator) = &self.comparator {
            debug!("Sorting {} items by {}", view.len(), comparator.name());
            // `sort_by` is stable: ties keep their input order
            view.sort_by(|a, b| comparator.compare(a, b));
        }
        view
    }
}

impl<T> Default for FilterPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    struct Even;

    impl Filter<u32> for Even {
        fn name(&self) -> &str {
            "Even"
        }

        fn keep(&self, item: &u32) -> bool {
            item % 2 == 0
        }
    }

    struct Below(u32);

    impl Filter<u32> for Below {
        fn name(&self) -> &str {
            "Below"
        }

        fn keep(&self, item: &u32) -> bool {
            *item < self.0
        }
    }

    struct Descending;

    impl Comparator<u32> for Descending {
        fn name(&self) -> &str {
            "Descending"
        }

        fn compare(&self, a: &u32, b: &u32) -> Ordering {
            b.cmp(a)
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline: FilterPipeline<u32> = FilterPipeline::new();
        let items = vec![3, 1, 2];

        assert_eq!(pipeline.apply(&items), vec![3, 1, 2]);
    }

    #[test]
    fn test_filters_are_anded() {
        let pipeline = FilterPipeline::new().add_filter(Even).add_filter(Below(7));
        let items = vec![1, 2, 4, 6, 8, 9];

        assert_eq!(pipeline.apply(&items), vec![2, 4, 6]);
        assert_eq!(pipeline.filter_names(), vec!["Even", "Below"]);
    }

    #[test]
    fn test_sort_runs_after_filters() {
        let pipeline = FilterPipeline::new().add_filter(Even).sort_by(Descending);
        let items = vec![2, 5, 8, 4];

        assert_eq!(pipeline.apply(&items), vec![8, 4, 2]);
        // Source untouched
        assert_eq!(items, vec![2, 5, 8, 4]);
    }
}
