//! Core types for album-art-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// An album page link whose trailing characters identify the album
///
/// The identifier is the last `identifier_length` characters of the link. It is
/// the dedup key and the value embedded into the downloaded artwork.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    url: String,
    identifier_start: usize,
}

impl Link {
    /// Create a link, taking its trailing `identifier_length` characters as the identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLink`] if the link is shorter than `identifier_length`.
    pub fn new(url: impl Into<String>, identifier_length: usize) -> Result<Self> {
        let url = url.into();
        let char_count = url.chars().count();
        if identifier_length == 0 || char_count < identifier_length {
            return Err(Error::InvalidLink {
                link: url,
                required: identifier_length,
            });
        }

        let identifier_start = url
            .char_indices()
            .nth(char_count - identifier_length)
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        Ok(Self {
            url,
            identifier_start,
        })
    }

    /// The full link
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The trailing album identifier
    pub fn identifier(&self) -> &str {
        &self.url[self.identifier_start..]
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

/// Artwork URL and title extracted from one album page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    /// Artwork image URL
    pub image: String,
    /// Album display name
    pub title: String,
}

/// Pipeline stage a link failed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Fetching or parsing the album page
    PageFetch,
    /// Fetching the artwork bytes
    ArtFetch,
    /// Tagging and persisting the artwork
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::PageFetch => "page_fetch",
            Stage::ArtFetch => "art_fetch",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// Why a link was not downloaded, without anything having gone wrong
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Artwork with this identifier is already on disk (or earlier in the same input)
    AlreadyPresent,
    /// The page lacks one or both metadata tags
    IncompleteMetadata {
        /// Names of the missing fields ("image", "title")
        missing: Vec<String>,
    },
    /// The target file belongs to another album and the collision policy is skip
    TitleCollision {
        /// The occupied path
        path: PathBuf,
    },
}

/// Terminal outcome of one input link
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// Artwork written and tagged
    Downloaded {
        /// Path of the written artifact
        path: PathBuf,
    },
    /// Nothing to do for this link
    Skipped(SkipReason),
    /// Processing stopped on an error
    Failed {
        /// Stage that failed
        stage: Stage,
        /// Machine-readable error code
        code: String,
        /// Human-readable error message
        message: String,
    },
}

impl LinkOutcome {
    /// Build a failure outcome from an error
    pub fn failed(stage: Stage, error: &Error) -> Self {
        LinkOutcome::Failed {
            stage,
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of one link, as recorded in a [`RunReport`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    /// The input link
    pub link: String,
    /// The link's album identifier
    pub identifier: String,
    /// What happened to it
    pub outcome: LinkOutcome,
}

/// Per-link outcomes of a completed run, in input order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the last task finished
    pub finished_at: DateTime<Utc>,
    /// One entry per input link
    pub links: Vec<LinkReport>,
}

impl RunReport {
    /// Number of links whose artwork was written
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Downloaded { .. }))
    }

    /// Number of links skipped
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Skipped(_)))
    }

    /// Number of links that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Failed { .. }))
    }

    /// Look up the outcome for a link
    pub fn outcome_for(&self, link: &str) -> Option<&LinkOutcome> {
        self.links
            .iter()
            .find(|r| r.link == link)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.links.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Progress events emitted during a run
///
/// Subscribe with [`AlbumArtDownloader::subscribe`](crate::AlbumArtDownloader::subscribe).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Work list computed
    Planned {
        /// Number of input links
        total: usize,
        /// Number of links that will be fetched
        pending: usize,
    },
    /// Album page fetched and both fields extracted
    PageFetched {
        /// Album identifier
        identifier: String,
        /// Extracted title
        title: String,
    },
    /// Artwork written
    ArtworkSaved {
        /// Album identifier
        identifier: String,
        /// Path of the artifact
        path: PathBuf,
    },
    /// Link skipped
    LinkSkipped {
        /// Album identifier
        identifier: String,
        /// Why
        reason: SkipReason,
    },
    /// Link failed
    LinkFailed {
        /// Album identifier
        identifier: String,
        /// Stage that failed
        stage: Stage,
        /// Error message
        error: String,
    },
    /// All tasks drained
    RunComplete {
        /// Links downloaded
        downloaded: usize,
        /// Links skipped
        skipped: usize,
        /// Links failed
        failed: usize,
    },
}
