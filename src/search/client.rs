//! Image search client with retry
//!
//! Wraps a [`SearchBackend`] and retries failed attempts immediately, surfacing
//! only the last error once every attempt has failed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::backend::{HttpBackend, SearchBackend};
use super::SearchError;
use crate::data::ImageResult;

/// Default image search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/images";

/// Additional attempts after the first one fails
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Settings for talking to the image search API
#[derive(Clone)]
pub struct SearchConfig {
    /// URL requests are POSTed to
    pub endpoint: String,
    /// Static key sent in the `X-API-KEY` header
    pub api_key: String,
    /// Additional attempts after a failed one
    pub max_retries: u32,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    /// Creates a configuration with default endpoint, retries and no timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for searching recipe images
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
    max_retries: u32,
}

impl SearchClient {
    /// Creates a client talking HTTP to the configured endpoint
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), config.max_retries))
    }

    /// Creates a client on top of a custom backend
    pub fn with_backend(backend: Arc<dyn SearchBackend>, max_retries: u32) -> Self {
        Self {
            backend,
            max_retries,
        }
    }

    /// Additional attempts made after a failure
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Searches for images matching `query`
    ///
    /// # Returns
    /// * `Ok(Vec<ImageResult>)` - Images in server order, each with a fresh local id
    /// * `Err(SearchError)` - The error of the last attempt once all attempts failed
    pub async fn search(&self, query: &str) -> Result<Vec<ImageResult>, SearchError> {
        let attempts = self.max_retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.backend.search_images(query).await {
                Ok(images) => {
                    tracing::debug!(query, attempt, count = images.len(), "Search succeeded");
                    return Ok(images);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(query, attempt, error = %e, "Search attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(query, attempts, error = %e, "Search failed");
                    return Err(e);
                }
            }
        }
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
