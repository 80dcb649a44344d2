use indexmap::IndexMap;
use serde::Serialize;

use crate::item::{AlbumId, Item};

/// Per-album counts over an item set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemStats {
    pub total_items: usize,
    pub total_albums: usize,
    /// Album id -> item count, in order of first appearance
    pub items_per_album: IndexMap<AlbumId, usize>,
}

/// Count items and distinct albums
pub fn item_stats(items: &[Item]) -> ItemStats {
    let mut items_per_album = IndexMap::new();
    for item in items {
        *items_per_album.entry(item.album_id).or_insert(0) += 1;
    }

    ItemStats {
        total_items: items.len(),
        total_albums: items_per_album.len(),
        items_per_album,
    }
}
