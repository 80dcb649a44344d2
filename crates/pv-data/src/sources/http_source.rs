use async_trait::async_trait;
use pv_core::Item;
use serde_json::Value;
use tracing::debug;

use crate::config::SourceConfig;
use crate::normalize::{normalize_records, parse_records};
use crate::DataError;

/// Photo source fetching the collection over HTTP
pub struct HttpPhotoSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPhotoSource {
    /// Build a source for the configured endpoint and timeout
    pub fn new(config: &SourceConfig) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .build()?;

        Ok(Self {
            client,
            url: config.photos_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the collection; any non-2xx status is an error
    async fn fetch_records(&self) -> Result<Vec<Value>, DataError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes", body.len());
        parse_records(&body)
    }
}

#[async_trait]
impl pv_core::PhotoSource for HttpPhotoSource {
    async fn fetch(&self) -> anyhow::Result<Vec<Item>> {
        let raw = self.fetch_records().await?;
        Ok(normalize_records(&raw)?)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
