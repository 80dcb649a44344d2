use std::num::NonZeroUsize;

use serde::Serialize;

use crate::item::Item;

/// Page size used when nothing else is configured
pub const DEFAULT_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(n) => n,
    None => panic!("default page size must be non-zero"),
};

/// One page of a sequence plus the pagination metadata to render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T = Item> {
    /// The slice to display
    pub items: Vec<T>,

    /// The clamped, 1-based page number that was actually used
    pub page: usize,

    /// Number of pages, never less than 1
    pub total_pages: usize,

    /// Length of the sequence that was paginated
    pub total_items: usize,
}

impl<T> PageResult<T> {
    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `ceil(len / per_page)` with a floor of 1
pub fn total_pages(len: usize, per_page: NonZeroUsize) -> usize {
    len.div_ceil(per_page.get()).max(1)
}

/// Snap a requested page into `[1, total_pages]`
pub fn clamp_page(page: i64, total_pages: usize) -> usize {
    let last = i64::try_from(total_pages.max(1)).unwrap_or(i64::MAX);
    // In range after the clamp, so the cast cannot truncate
    page.clamp(1, last) as usize
}

/// Slice `items` down to the requested page
///
/// Out-of-range pages snap to the nearest boundary instead of failing.
pub fn paginate<T: Clone>(items: &[T], page: i64, per_page: NonZeroUsize) -> PageResult<T> {
    let total_pages = total_pages(items.len(), per_page);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * per_page.get()).min(items.len());
    let end = (start + per_page.get()).min(items.len());

    PageResult {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items: items.len(),
    }
}
