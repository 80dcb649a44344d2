//! Normalized photo records

use serde::{Deserialize, Serialize};

/// Unique identifier of a photo within a load
pub type ItemId = u64;

/// Identifier of the album a photo belongs to
pub type AlbumId = u64;

/// A normalized photo record with display and grouping metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Display title
    pub title: String,

    /// Reference to the small preview image
    pub thumbnail_url: String,

    /// Reference to the full-size image
    pub url: String,

    /// Album grouping key
    pub album_id: AlbumId,

    /// Derived from `album_id`, see [`album_description`]
    pub description: String,
}

impl Item {
    /// Build an item, deriving its description from the album id
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
        url: impl Into<String>,
        album_id: AlbumId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
            url: url.into(),
            album_id,
            description: album_description(album_id),
        }
    }
}

/// Description shown for every photo of an album
pub fn album_description(album_id: AlbumId) -> String {
    format!("Photo belonging to album {}.", album_id)
}
