//! Image search API client
//!
//! This module sends the built query to the image search provider, decodes
//! the response and retries failed attempts. The transport sits behind the
//! [`SearchBackend`] trait so the retry and fetch logic can run against a
//! scripted backend.

mod backend;
mod client;
mod error;

pub use backend::{HttpBackend, SearchBackend};
pub use client::{SearchClient, SearchConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
pub use error::SearchError;
