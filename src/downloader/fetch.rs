//! HTTP transport seam: the [`Fetcher`] trait and its reqwest implementation.

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::error::{FetchError, Result};

/// A fetched response body
#[derive(Clone, Debug)]
pub struct FetchedBody {
    /// Raw body bytes
    pub bytes: Vec<u8>,
    /// `Content-Type` header value, if any
    pub content_type: Option<String>,
}

/// Abstraction over HTTP GET, enabling fake transports in tests.
///
/// Implementations must treat any non-2xx status as [`FetchError::Status`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and read the whole body
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedBody, FetchError>;
}

/// Production [`Fetcher`] backed by a pooled [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client from the HTTP settings
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created (e.g. TLS backend failure)
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedBody, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(FetchedBody {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
