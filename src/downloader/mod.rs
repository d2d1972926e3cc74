//! Album art pipeline split into focused submodules.
//!
//! The `AlbumArtDownloader` struct and its methods are organized by stage:
//! - [`fetch`] - HTTP transport seam and the reqwest implementation
//! - [`run`] - Scan, plan, spawn and report assembly
//! - [`page_task`] - Album page fetch and metadata extraction
//! - [`art_task`] - Artwork fetch, tagging and write
//! - [`context`] - State shared by every task of one run

mod art_task;
mod context;
pub mod fetch;
mod page_task;
mod run;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use fetch::{FetchedBody, Fetcher, HttpFetcher};

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::extractor::PageExtractor;
use crate::planner::parse_links;
use crate::store::ArtifactStore;
use crate::types::{Event, RunReport};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main pipeline instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct AlbumArtDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Transport used for album pages
    pub(crate) page_fetcher: Arc<dyn Fetcher>,
    /// Transport used for artwork images
    pub(crate) art_fetcher: Arc<dyn Fetcher>,
    /// Metadata extractor built from the extraction settings
    pub(crate) extractor: Arc<PageExtractor>,
    /// Output directory access
    pub(crate) store: Arc<ArtifactStore>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl AlbumArtDownloader {
    /// Create a downloader with reqwest transports built from `config.http`
    ///
    /// Pages and artwork get separate connection pools unless
    /// `separate_clients` is false.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for invalid settings, or a
    /// network error if an HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let page_fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.http)?);
        let art_fetcher: Arc<dyn Fetcher> = if config.http.separate_clients {
            Arc::new(HttpFetcher::new(&config.http)?)
        } else {
            Arc::clone(&page_fetcher)
        };

        Self::with_fetchers(config, page_fetcher, art_fetcher)
    }

    /// Create a downloader over caller-supplied transports
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for invalid settings.
    pub fn with_fetchers(
        config: Config,
        page_fetcher: Arc<dyn Fetcher>,
        art_fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        config.validate()?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let extractor = PageExtractor::new(config.extraction.clone());
        let store = ArtifactStore::new(
            config.download.output_dir.clone(),
            config.download.file_collision,
        );

        Ok(Self {
            config: Arc::new(config),
            page_fetcher,
            art_fetcher,
            extractor: Arc::new(extractor),
            store: Arc::new(store),
            event_tx,
        })
    }

    /// Subscribe to progress events
    ///
    /// Events sent while nobody is subscribed are dropped.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse comma-space separated links and run the pipeline over them
    ///
    /// # Errors
    ///
    /// Fails before any fetch if an entry is too short to carry an identifier,
    /// or with the errors of [`run`](Self::run).
    pub async fn run_input(&self, text: &str) -> Result<RunReport> {
        let links = parse_links(text, self.config.download.identifier_length)?;
        self.run(links).await
    }
}
