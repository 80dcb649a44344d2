use std::path::PathBuf;

use async_trait::async_trait;
use pv_core::Item;
use tracing::debug;

use crate::normalize::{normalize_records, parse_records};
use crate::DataError;

/// Photo source backed by a local JSON file in the API's wire format
pub struct JsonFilePhotoSource {
    path: PathBuf,
    name: String,
}

impl JsonFilePhotoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    async fn read_records(&self) -> Result<Vec<Item>, DataError> {
        let body = tokio::fs::read(&self.path).await?;
        debug!("Read {} bytes from {}", body.len(), self.name);
        let raw = parse_records(&body)?;
        normalize_records(&raw)
    }
}

#[async_trait]
impl pv_core::PhotoSource for JsonFilePhotoSource {
    async fn fetch(&self) -> anyhow::Result<Vec<Item>> {
        Ok(self.read_records().await?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
