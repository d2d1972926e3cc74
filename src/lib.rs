//! # album-art-dl
//!
//! Concurrent album artwork downloader with metadata-embedded deduplication.
//!
//! ## How it works
//!
//! - **Input** - comma-space separated album page links; the trailing
//!   characters of each link are its album identifier
//! - **Dedup** - every saved image carries its identifier in EXIF metadata, so
//!   the output directory alone tells which albums are already downloaded
//! - **Fan-out** - album pages are fetched concurrently, and each page spawns
//!   its own artwork download
//! - **Event-driven** - consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use album_art_dl::{AlbumArtDownloader, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.download.output_dir = "album_arts".into();
//!
//!     let downloader = AlbumArtDownloader::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let report = downloader
//!         .run_input("https://music.youtube.com/playlist?list=OLAK5uy_abcdefghijk")
//!         .await?;
//!     println!("{} downloaded, {} failed", report.downloaded(), report.failed());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Album art pipeline (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Album page metadata extraction
pub mod extractor;
/// Link parsing and work-list planning
pub mod planner;
/// Output directory access
pub mod store;
/// Embedded identifier read/write
pub mod tagging;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, FileCollisionAction};
pub use downloader::{AlbumArtDownloader, FetchedBody, Fetcher, HttpFetcher};
pub use error::{Error, FetchError, Result, TagError};
pub use types::{
    AlbumMetadata, Event, Link, LinkOutcome, LinkReport, RunReport, SkipReason, Stage,
};
