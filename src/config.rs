//! Configuration types for album-art-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Download behavior configuration (output directory, concurrency, collisions)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory that holds the artwork and doubles as the dedup index (default: "./album_arts")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum HTTP requests in flight across both stages (default: 16)
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Number of trailing link characters that identify an album (default: 11)
    #[serde(default = "default_identifier_length")]
    pub identifier_length: usize,

    /// What to do when two albums sanitize to the same file name
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_concurrent_requests: default_max_concurrent_requests(),
            identifier_length: default_identifier_length(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// HTTP client configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total per-request timeout (None = transport default, no timeout)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// TCP connect timeout (default: 30 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Use one connection pool for album pages and another for artwork (default: true)
    #[serde(default = "default_true")]
    pub separate_clients: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
            separate_clients: true,
        }
    }
}

/// Which `<meta>` tags carry the artwork URL and the album title
///
/// The defaults match Open Graph markup:
/// `<meta property="og:image" content="...">` and `<meta property="og:title" content="...">`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Element name to inspect (default: "meta")
    #[serde(default = "default_meta_tag")]
    pub tag: String,

    /// Attribute whose value selects the tag (default: "property")
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,

    /// Attribute that carries the payload (default: "content")
    #[serde(default = "default_content_attribute")]
    pub content_attribute: String,

    /// Key value marking the artwork URL (default: "og:image")
    #[serde(default = "default_image_key")]
    pub image_key: String,

    /// Key value marking the album title (default: "og:title")
    #[serde(default = "default_title_key")]
    pub title_key: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tag: default_meta_tag(),
            key_attribute: default_key_attribute(),
            content_attribute: default_content_attribute(),
            image_key: default_image_key(),
            title_key: default_title_key(),
        }
    }
}

/// Main configuration for [`AlbumArtDownloader`](crate::AlbumArtDownloader)
///
/// Sub-configs are flattened, so the TOML/JSON form is a single flat table:
///
/// ```toml
/// output_dir = "album_arts"
/// max_concurrent_requests = 8
/// request_timeout = 30
/// file_collision = "rename"
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output directory, concurrency and collision handling
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// HTTP client settings
    #[serde(flatten)]
    pub http: HttpConfig,

    /// Page metadata selection
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }

    /// Parse a TOML document; absent keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            message: format!("invalid config: {e}"),
            key: None,
        })
    }

    /// Load a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read config file {}: {e}", path.display()),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.download.max_concurrent_requests == 0 {
            return Err(Error::Config {
                message: "max_concurrent_requests must be at least 1".to_string(),
                key: Some("max_concurrent_requests".to_string()),
            });
        }
        if self.download.max_concurrent_requests > tokio::sync::Semaphore::MAX_PERMITS {
            return Err(Error::Config {
                message: format!(
                    "max_concurrent_requests must be at most {}",
                    tokio::sync::Semaphore::MAX_PERMITS
                ),
                key: Some("max_concurrent_requests".to_string()),
            });
        }
        if self.download.identifier_length == 0 {
            return Err(Error::Config {
                message: "identifier_length must be at least 1".to_string(),
                key: Some("identifier_length".to_string()),
            });
        }
        if self.extraction.image_key == self.extraction.title_key {
            return Err(Error::Config {
                message: "image_key and title_key must differ".to_string(),
                key: Some("title_key".to_string()),
            });
        }
        for (key, value) in [
            ("tag", &self.extraction.tag),
            ("key_attribute", &self.extraction.key_attribute),
            ("content_attribute", &self.extraction.content_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("{key} must not be empty"),
                    key: Some(key.to_string()),
                });
            }
        }
        Ok(())
    }
}

/// File collision handling strategy
///
/// Two different albums can sanitize to the same title. The artwork is still
/// deduplicated by its embedded identifier, so every choice is safe for reruns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to the file name
    Rename,
    /// Overwrite the existing file, last write wins (default)
    #[default]
    Overwrite,
    /// Keep the existing file and skip the new artwork
    Skip,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./album_arts")
}

fn default_max_concurrent_requests() -> usize {
    16
}

fn default_identifier_length() -> usize {
    11
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("album-art-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn default_meta_tag() -> String {
    "meta".to_string()
}

fn default_key_attribute() -> String {
    "property".to_string()
}

fn default_content_attribute() -> String {
    "content".to_string()
}

fn default_image_key() -> String {
    "og:image".to_string()
}

fn default_title_key() -> String {
    "og:title".to_string()
}

// Duration serialization helper (as integer seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
