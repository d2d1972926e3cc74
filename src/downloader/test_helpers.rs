//! Shared test helpers: a scripted in-memory transport and downloader builder.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::Config;
use crate::downloader::AlbumArtDownloader;
use crate::downloader::fetch::{FetchedBody, Fetcher};
use crate::error::FetchError;

#[derive(Clone)]
enum Route {
    Body {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    Status(u16),
}

/// Serves canned responses by exact URL; unknown URLs fail as transport errors.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    routes: HashMap<String, Route>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `html` as `text/html` at `url`
    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.body(url, html.as_bytes().to_vec(), Some("text/html; charset=utf-8"))
    }

    /// Serve image bytes as `image/jpeg` at `url`
    pub(crate) fn image(self, url: &str, bytes: Vec<u8>) -> Self {
        self.body(url, bytes, Some("image/jpeg"))
    }

    pub(crate) fn body(mut self, url: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    /// Answer `url` with a non-success status
    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(url.to_string(), Route::Status(status));
        self
    }

    /// Hold every response for `delay` before answering
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.routes.get(url).cloned() {
            Some(Route::Body {
                bytes,
                content_type,
            }) => Ok(FetchedBody {
                bytes,
                content_type,
            }),
            Some(Route::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

/// Config writing into a fresh temp dir
/// Returns the config and the tempdir (which must be kept alive).
pub(crate) fn test_config() -> (Config, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.output_dir = temp_dir.path().join("album_arts");
    config.download.max_concurrent_requests = 4;
    (config, temp_dir)
}

/// Downloader whose pages and artwork are both served by `fetcher`
pub(crate) fn create_test_downloader(
    config: Config,
    fetcher: Arc<FakeFetcher>,
) -> AlbumArtDownloader {
    AlbumArtDownloader::with_fetchers(config, fetcher.clone(), fetcher).unwrap()
}
