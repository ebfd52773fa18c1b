use thiserror::Error;

/// Errors that can occur when searching for recipe images
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request body could not be serialized
    #[error("Invalid request data: {0}")]
    InvalidRequestData(#[source] serde_json::Error),

    /// HTTP request failed or the server answered with a non-success status
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}
