//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pv_core::{GalleryController, PhotoSource};
use pv_data::{HttpPhotoSource, JsonFilePhotoSource, SourceConfig};

mod commands;
mod demo;
mod terminal;

use terminal::{Terminal, ViewLogger};

/// Browse, filter and page through a photo collection
#[derive(Debug, Parser)]
#[command(name = "photoview", version)]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read photos from a local JSON file instead of the API
    #[arg(long, conflicts_with = "demo")]
    file: Option<PathBuf>,

    /// Use generated photos, no network access
    #[arg(long)]
    demo: bool,

    /// Photos per page
    #[arg(long)]
    per_page: Option<usize>,

    /// API root, overrides the configuration file
    #[arg(long)]
    base_url: Option<String>,

    /// Number of photos to request
    #[arg(long)]
    limit: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Configuration file (or defaults) with command-line overrides applied
    fn source_config(&self) -> Result<SourceConfig> {
        let mut config = match &self.config {
            Some(path) => SourceConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => SourceConfig::default(),
        };

        if let Some(per_page) = self.per_page {
            config.per_page = per_page;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }

        config.validate()?;
        Ok(config)
    }

    fn photo_source(&self, config: &SourceConfig) -> Result<Arc<dyn PhotoSource>> {
        if self.demo {
            let count = config.limit.unwrap_or(60) as u64;
            return Ok(Arc::new(demo::DemoSource::new(count)));
        }
        if let Some(path) = &self.file {
            return Ok(Arc::new(JsonFilePhotoSource::new(path)));
        }
        Ok(Arc::new(HttpPhotoSource::new(config)?))
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the terminal view
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Starting photo viewer");

    let config = args.source_config()?;
    let source = args.photo_source(&config)?;
    let controller = Arc::new(GalleryController::new(config.per_page()?));

    let logger: Arc<dyn pv_core::ViewSubscriber> = Arc::new(ViewLogger);
    controller.subscribe(logger.clone());

    info!("Using {} photos per page from {}", config.per_page, source.source_name());
    Terminal::new(controller, source, std::io::stdout()).run().await
}
