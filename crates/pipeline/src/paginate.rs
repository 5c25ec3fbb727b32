//! 1-based paging over an ordered view.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// 1-based; 0 is read as 1
    pub page: usize,
    /// At least 1
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Everything on one page
    pub fn all() -> Self {
        Self::new(1, usize::MAX)
    }

    fn normalized(self) -> (usize, usize) {
        (self.page.max(1), self.per_page.max(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the totals of the full view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Cut `items` down to the requested page.
///
/// A page past the end comes back empty, with the totals intact.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let (page, per_page) = request.normalized();
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(items.clone(), PageRequest::new(1, 10));
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(!first.is_last());

        let last = paginate(items, PageRequest::new(3, 10));
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(last.is_last());
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let page = paginate(vec!['a', 'b', 'c'], PageRequest::new(0, 0));

        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec!['a']);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_past_the_end_is_empty() {
        let page = paginate(vec![1, 2, 3], PageRequest::new(9, 2));

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_all_and_empty() {
        let page = paginate(vec![1, 2, 3], PageRequest::all());
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 1);

        let empty = paginate(Vec::<u8>::new(), PageRequest::default());
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_last());
    }
}
