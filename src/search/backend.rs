//! Single-attempt transport to the image search API

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{SearchConfig, SearchError};
use crate::data::{ImageResult, SearchRequest, SearchResponse};

/// Header carrying the static API key
const API_KEY_HEADER: &str = "X-API-KEY";

/// One round trip to an image search provider
///
/// Implementations make exactly one attempt; retrying is the job of
/// [`SearchClient`](super::SearchClient).
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Sends `query` and returns the decoded images in server order
    async fn search_images(&self, query: &str) -> Result<Vec<ImageResult>, SearchError>;
}

/// Backend talking JSON over HTTP to the configured endpoint
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpBackend {
    /// Creates a backend from the search configuration
    ///
    /// Without a configured timeout requests may wait indefinitely.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Returns the endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search_images(&self, query: &str) -> Result<Vec<ImageResult>, SearchError> {
        let body = serde_json::to_vec(&SearchRequest { q: query })
            .map_err(SearchError::InvalidRequestData)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let search_response: SearchResponse = serde_json::from_slice(&bytes)?;

        Ok(search_response.images)
    }
}
