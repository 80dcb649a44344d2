//! Session view state and its transition function

use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::Serialize;

use crate::item::Item;
use crate::navigation::{PageCursor, PageDirection};
use crate::pipeline::{filter_items, paginate, total_pages, PageResult};

/// Message shown to the user when a load fails; the cause is only logged
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load photos. Please try again.";

/// Lifecycle of the item data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing loaded yet
    Initial,
    /// A load is in flight
    Loading,
    /// Items are available
    Loaded,
    /// The last load failed; retry by loading again
    Error { message: String },
}

/// Inputs to the transition function
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    LoadStarted,
    LoadSucceeded(Vec<Item>),
    LoadFailed,
    QueryChanged(String),
    PageRequested(PageDirection),
}

/// Everything the presentation needs, derived or stored
///
/// `filtered_items` is always `filter_items(all_items, search_query)` and
/// `current_page` always lies within `[1, total_pages]`. Both are only
/// reachable through [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    all_items: Arc<[Item]>,
    filtered_items: Vec<Item>,
    current_page: usize,
    per_page: NonZeroUsize,
    search_query: String,
    load_state: LoadState,
}

impl ViewState {
    /// Empty state in [`LoadState::Initial`]
    pub fn new(per_page: NonZeroUsize) -> Self {
        Self {
            all_items: Arc::from(Vec::new()),
            filtered_items: Vec::new(),
            current_page: 1,
            per_page,
            search_query: String::new(),
            load_state: LoadState::Initial,
        }
    }

    /// Compute the state that follows `intent`
    ///
    /// Returns `None` when the intent is a no-op in the current state:
    /// a second load while one is pending, a load result with no load
    /// pending, an unchanged query, or a page step past either boundary.
    pub fn apply(&self, intent: Intent) -> Option<ViewState> {
        match intent {
            Intent::LoadStarted => {
                if self.load_state == LoadState::Loading {
                    return None;
                }
                Some(Self {
                    load_state: LoadState::Loading,
                    ..self.clone()
                })
            }
            Intent::LoadSucceeded(items) => {
                if self.load_state != LoadState::Loading {
                    return None;
                }
                Some(Self {
                    filtered_items: items.clone(),
                    all_items: Arc::from(items),
                    current_page: 1,
                    per_page: self.per_page,
                    search_query: String::new(),
                    load_state: LoadState::Loaded,
                })
            }
            Intent::LoadFailed => {
                if self.load_state != LoadState::Loading {
                    return None;
                }
                Some(Self {
                    load_state: LoadState::Error {
                        message: LOAD_FAILURE_MESSAGE.to_string(),
                    },
                    ..Self::new(self.per_page)
                })
            }
            Intent::QueryChanged(query) => {
                let query = query.trim();
                if self.load_state != LoadState::Loaded || query == self.search_query {
                    return None;
                }
                Some(Self {
                    filtered_items: filter_items(&self.all_items, query),
                    search_query: query.to_string(),
                    current_page: 1,
                    ..self.clone()
                })
            }
            Intent::PageRequested(direction) => {
                let cursor = PageCursor::new(self.current_page, self.total_pages())
                    .step(direction)
                    .ok()?;
                Some(Self {
                    current_page: cursor.page(),
                    ..self.clone()
                })
            }
        }
    }

    /// Page to render for the current state
    pub fn page_result(&self) -> PageResult {
        let page = i64::try_from(self.current_page).unwrap_or(i64::MAX);
        paginate(&self.filtered_items, page, self.per_page)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_items.len(), self.per_page)
    }

    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    pub fn filtered_items(&self) -> &[Item] {
        &self.filtered_items
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(count: u64) -> Vec<Item> {
        (1..=count)
            .map(|id| {
                let title = if id % 2 == 0 {
                    format!("even photo {}", id)
                } else {
                    format!("odd photo {}", id)
                };
                Item::new(id, title, "thumb", "url", (id - 1) / 10 + 1)
            })
            .collect()
    }

    fn loaded(count: u64) -> ViewState {
        ViewState::new(NonZeroUsize::new(12).unwrap())
            .apply(Intent::LoadStarted)
            .unwrap()
            .apply(Intent::LoadSucceeded(photos(count)))
            .unwrap()
    }

    #[test]
    fn test_load_resets_view() {
        let state = loaded(30);
        assert_eq!(state.load_state(), &LoadState::Loaded);
        assert_eq!(state.filtered_items(), state.all_items());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.search_query(), "");
        assert_eq!(state.total_pages(), 3);
    }

    #[test]
    fn test_second_load_start_is_ignored() {
        let loading = ViewState::new(NonZeroUsize::new(12).unwrap())
            .apply(Intent::LoadStarted)
            .unwrap();
        assert!(loading.apply(Intent::LoadStarted).is_none());
    }

    #[test]
    fn test_result_without_pending_load_is_ignored() {
        let state = ViewState::new(NonZeroUsize::new(12).unwrap());
        assert!(state.apply(Intent::LoadSucceeded(photos(3))).is_none());
        assert!(state.apply(Intent::LoadFailed).is_none());
        assert!(loaded(3).apply(Intent::LoadFailed).is_none());
    }

    #[test]
    fn test_failure_drops_items_and_can_retry() {
        let failed = loaded(30)
            .apply(Intent::LoadStarted)
            .unwrap()
            .apply(Intent::LoadFailed)
            .unwrap();
        assert_eq!(
            failed.load_state(),
            &LoadState::Error {
                message: LOAD_FAILURE_MESSAGE.to_string()
            }
        );
        assert!(failed.all_items().is_empty());
        assert!(failed.page_result().is_empty());

        let retried = failed
            .apply(Intent::LoadStarted)
            .unwrap()
            .apply(Intent::LoadSucceeded(photos(5)))
            .unwrap();
        assert_eq!(retried.load_state(), &LoadState::Loaded);
        assert_eq!(retried.all_items().len(), 5);
    }

    #[test]
    fn test_query_filters_and_resets_page() {
        let state = loaded(30)
            .apply(Intent::PageRequested(PageDirection::Next))
            .unwrap();
        assert_eq!(state.current_page(), 2);

        let filtered = state.apply(Intent::QueryChanged("EVEN".into())).unwrap();
        assert_eq!(filtered.current_page(), 1);
        assert_eq!(filtered.search_query(), "EVEN");
        assert_eq!(filtered.filtered_items().len(), 15);
        assert_eq!(filtered.filtered_items(), filter_items(filtered.all_items(), "EVEN"));
    }

    #[test]
    fn test_same_query_is_noop() {
        let filtered = loaded(30).apply(Intent::QueryChanged("odd".into())).unwrap();
        assert!(filtered.apply(Intent::QueryChanged("odd".into())).is_none());
        assert!(filtered.apply(Intent::QueryChanged("  odd ".into())).is_none());
        assert!(loaded(30).apply(Intent::QueryChanged("".into())).is_none());
    }

    #[test]
    fn test_query_before_load_is_ignored() {
        let state = ViewState::new(NonZeroUsize::new(12).unwrap());
        assert!(state.apply(Intent::QueryChanged("abc".into())).is_none());
    }

    #[test]
    fn test_next_on_last_page_is_noop() {
        let state = loaded(13)
            .apply(Intent::PageRequested(PageDirection::Next))
            .unwrap();
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.page_result().items.len(), 1);
        assert!(state.apply(Intent::PageRequested(PageDirection::Next)).is_none());
    }

    #[test]
    fn test_previous_on_first_page_is_noop() {
        assert!(loaded(30).apply(Intent::PageRequested(PageDirection::Previous)).is_none());
    }

    #[test]
    fn test_paging_over_filtered_set() {
        // 3 pages unfiltered, 2 pages once filtered down to 15 items
        let state = loaded(30).apply(Intent::QueryChanged("odd".into())).unwrap();
        let last = state.apply(Intent::PageRequested(PageDirection::Next)).unwrap();
        let result = last.page_result();
        assert_eq!(result.page, 2);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.items.len(), 3);
        assert!(last.apply(Intent::PageRequested(PageDirection::Next)).is_none());
    }

    #[test]
    fn test_empty_filter_result_has_one_page() {
        let state = loaded(30).apply(Intent::QueryChanged("nothing".into())).unwrap();
        let result = state.page_result();
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.page, 1);
        assert!(result.is_empty());
    }
}
