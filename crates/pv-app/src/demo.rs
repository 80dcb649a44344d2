//! Demo mode for the photo viewer
//! Generates synthetic records so the viewer works without network access

use anyhow::Result;
use async_trait::async_trait;
use pv_core::{Item, PhotoSource};
use serde_json::{json, Value};

const WORDS: &[&str] = &[
    "accusamus", "beatae", "ad", "facilis", "cum", "similique", "qui", "sunt",
    "reprehenderit", "est", "necessitatibus", "officia", "porro", "iure", "quia",
    "iusto", "culpa", "eligendi", "dolorem", "natus", "fugiat", "odio", "harum",
];

/// Demo photo source producing records in the API's wire format
pub struct DemoSource {
    count: u64,
    per_album: u64,
}

impl DemoSource {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            per_album: 50,
        }
    }

    fn record(&self, id: u64) -> Value {
        let title = (0..4)
            .map(|n| WORDS[((id * 7 + n * 11) % WORDS.len() as u64) as usize])
            .collect::<Vec<_>>()
            .join(" ");
        let color = format!("{:06x}", (id * 2_654_435_761) & 0xff_ffff);

        json!({
            "albumId": (id - 1) / self.per_album + 1,
            "id": id,
            "title": title,
            "url": format!("https://via.placeholder.com/600/{}", color),
            "thumbnailUrl": format!("https://via.placeholder.com/150/{}", color),
        })
    }
}

#[async_trait]
impl PhotoSource for DemoSource {
    async fn fetch(&self) -> Result<Vec<Item>> {
        let raw: Vec<Value> = (1..=self.count).map(|id| self.record(id)).collect();
        Ok(pv_data::normalize_records(&raw)?)
    }

    fn source_name(&self) -> &str {
        "demo"
    }
}
