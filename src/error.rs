//! Error types for album-art-dl
//!
//! This module provides the error handling for the library:
//! - A top-level [`Error`] used by every fallible operation
//! - Domain-specific errors for the fetch transport ([`FetchError`]) and the
//!   image metadata codec ([`TagError`])
//! - Machine-readable error codes recorded in per-link run reports

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for album-art-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for album-art-dl
///
/// Only [`Error::InvalidLink`], [`Error::Config`] and directory-level I/O failures are
/// fatal for a run. Everything else is confined to the link that produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_requests")
        key: Option<String>,
    },

    /// A link is too short to carry an album identifier
    #[error("invalid link {link:?}: expected at least {required} characters")]
    InvalidLink {
        /// The offending link text
        link: String,
        /// Minimum number of characters (the identifier length)
        required: usize,
    },

    /// The output directory could not be created or listed
    #[error("output directory {path} unusable: {source}")]
    OutputDir {
        /// The output directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Fetching a page or artwork failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A fetched page is not an HTML document
    #[error("parse error: {0}")]
    Parse(String),

    /// Embedding the identifier into the artwork failed
    #[error("tagging error: {0}")]
    Tag(#[from] TagError),

    /// A different album already occupies the artifact path
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// The reason for the collision (e.g., "file already exists")
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised by a [`Fetcher`](crate::downloader::Fetcher)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or no response arrived
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Requested URL
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be read
    #[error("failed to read body of {url}: {reason}")]
    Body {
        /// Requested URL
        url: String,
        /// Read failure reason
        reason: String,
    },

    /// The URL could not be parsed or resolved
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL text
        url: String,
        /// Parser message
        reason: String,
    },
}

/// Errors raised while embedding an identifier into image bytes
#[derive(Debug, Error)]
pub enum TagError {
    /// The bytes are not a container format that can carry EXIF metadata
    #[error("unsupported image container: {0}")]
    UnsupportedFormat(String),

    /// The identifier cannot be stored in the metadata field
    #[error("invalid identifier {0:?}: must be non-empty and free of NUL bytes")]
    InvalidIdentifier(String),

    /// Encoding the EXIF segment failed
    #[error("failed to encode EXIF segment: {0}")]
    Encode(String),
}

impl Error {
    /// Whether this error must abort the whole run rather than a single link
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::InvalidLink { .. } | Error::OutputDir { .. }
        )
    }

    /// Get the machine-readable error code
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidLink { .. } => "invalid_link",
            Error::OutputDir { .. } => "output_dir_error",
            Error::Fetch(e) => match e {
                FetchError::Transport { .. } => "transport_error",
                FetchError::Status { .. } => "http_status",
                FetchError::Body { .. } => "body_read_error",
                FetchError::InvalidUrl { .. } => "invalid_url",
            },
            Error::Parse(_) => "parse_error",
            Error::Tag(e) => match e {
                TagError::UnsupportedFormat(_) => "unsupported_image",
                TagError::InvalidIdentifier(_) => "invalid_identifier",
                TagError::Encode(_) => "exif_encode_error",
            },
            Error::FileCollision { .. } => "file_collision",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Other(_) => "internal_error",
        }
    }
}
