//! Configuration for loading photos

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Default photo API endpoint
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Configuration for a photo session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// API root; photos are fetched from `{base_url}/photos`
    pub base_url: String,

    /// Number of records requested, `None` for the full collection
    pub limit: Option<usize>,

    /// Request timeout in humantime notation, e.g. `"10s"` or `"1m 30s"`
    pub timeout: String,

    /// Items per page, must be positive
    pub per_page: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: Some(60),
            timeout: "10s".to_string(),
            per_page: 12,
        }
    }
}

impl SourceConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| DataError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that can be wrong
    pub fn validate(&self) -> Result<(), DataError> {
        if self.base_url.trim().is_empty() {
            return Err(DataError::Config("base_url must not be empty".to_string()));
        }
        if self.limit == Some(0) {
            return Err(DataError::Config("limit must be positive".to_string()));
        }
        self.per_page()?;
        self.timeout()?;
        Ok(())
    }

    pub fn per_page(&self) -> Result<NonZeroUsize, DataError> {
        NonZeroUsize::new(self.per_page)
            .ok_or_else(|| DataError::Config("per_page must be positive".to_string()))
    }

    pub fn timeout(&self) -> Result<Duration, DataError> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| DataError::Config(format!("invalid timeout {:?}: {}", self.timeout, e)))
    }

    /// Full URL of the photo collection
    pub fn photos_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.limit {
            Some(limit) => format!("{}/photos?_limit={}", base, limit),
            None => format!("{}/photos", base),
        }
    }
}
