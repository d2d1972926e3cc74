//! Test configuration helpers for creating downloaders over a temp directory

use std::path::PathBuf;
use std::time::Duration;

use album_art_dl::{AlbumArtDownloader, Config};
use tempfile::TempDir;

/// Config whose output directory lives inside `temp_dir`
pub fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.download.output_dir = output_dir(temp_dir);
    config.download.max_concurrent_requests = 4;
    config.http.request_timeout = Some(Duration::from_secs(10));
    config
}

/// The output directory used by [`test_config`]
pub fn output_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("album_arts")
}

/// Real HTTP downloader over `temp_dir`
pub fn create_test_downloader(temp_dir: &TempDir) -> AlbumArtDownloader {
    AlbumArtDownloader::new(test_config(temp_dir)).expect("valid test config")
}
