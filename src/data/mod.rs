//! Core data models for Chefify
//!
//! This module contains the recipe image result type shared by the search
//! client, the cache and the result screen, plus the search API wire payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recipe image returned by the search API
///
/// The `id` is generated locally whenever a result is decoded, either from the
/// API or from the cache. It is never sent or stored, and it takes no part in
/// equality: two results are equal when their API fields match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    /// Local identifier, fresh on every decode
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Title of the page the image was found on
    pub title: String,
    /// Direct URL of the image
    pub image_url: String,
    /// Site name or URL the recipe comes from
    pub source: String,
    /// Link to the recipe page
    pub link: String,
}

impl ImageResult {
    /// Creates a result with a fresh local id
    pub fn new(
        title: impl Into<String>,
        image_url: impl Into<String>,
        source: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            image_url: image_url.into(),
            source: source.into(),
            link: link.into(),
        }
    }

    /// Returns the source as an openable URL
    ///
    /// The API often reports the source as a bare site name such as
    /// `"bbcgoodfood.com"`; those get an `https://` scheme.
    pub fn source_url(&self) -> String {
        with_scheme(&self.source)
    }
}

impl PartialEq for ImageResult {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.image_url == other.image_url
            && self.source == other.source
            && self.link == other.link
    }
}

impl Eq for ImageResult {}

/// Response body of the image search API
///
/// Only `images` is read; any other fields the provider sends are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub images: Vec<ImageResult>,
}

/// Request body of the image search API
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
}

/// Formats a result count with the matching noun, e.g. "1 recipe" or "3 recipes"
pub fn recipe_count(count: usize) -> String {
    let noun = if count == 1 { "recipe" } else { "recipes" };
    format!("{} {}", count, noun)
}

/// Prepends `https://` unless the string already has an http(s) scheme
fn with_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
