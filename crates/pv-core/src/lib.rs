//! Core functionality for the photo viewer
//!
//! This crate provides the item model, the pure filter/pagination pipeline
//! and the view-state controller that the presentation layer talks to.

pub mod controller;
pub mod events;
pub mod item;
pub mod navigation;
pub mod pipeline;
pub mod state;

// Re-export commonly used types
pub use controller::{GalleryController, LoadTicket, ViewSnapshot, ViewSubscriber};
pub use item::{album_description, AlbumId, Item, ItemId};
pub use navigation::{PageCursor, PageDirection};
pub use pipeline::{
    filter_items, find_by_id, item_stats, paginate, total_pages, ItemStats, PageResult,
    DEFAULT_PER_PAGE,
};
pub use state::{Intent, LoadState, ViewState, LOAD_FAILURE_MESSAGE};
pub use data::PhotoSource;

pub mod data {
    use crate::item::Item;

    /// Trait for photo sources
    #[async_trait::async_trait]
    pub trait PhotoSource: Send + Sync {
        /// Fetch and normalize the full item set
        async fn fetch(&self) -> anyhow::Result<Vec<Item>>;

        /// Get the source name/location
        fn source_name(&self) -> &str;
    }
}
