//! Search result cache keyed by query string
//!
//! Stores the images returned for a query under `imageCache_<query>` in the
//! shared [`KeyValueStore`]. Entries never expire; they are replaced by the
//! next successful fetch of the same query or removed by [`ImageCache::clear`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::store::{CacheError, KeyValueStore};
use crate::data::ImageResult;

/// Namespace prefix for every key written by the image cache
pub const CACHE_PREFIX: &str = "imageCache";

/// Wrapper stored for each cached query
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached images, in API order
    images: T,
    /// When the images were cached
    cached_at: DateTime<Utc>,
}

/// Query-keyed cache of search results
#[derive(Debug)]
pub struct ImageCache {
    store: KeyValueStore,
}

impl ImageCache {
    /// Creates a cache on top of an already opened store
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    /// Opens the cache in a custom directory
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(KeyValueStore::open(dir))
    }

    /// Opens the cache in the default XDG cache directory
    pub fn open_default() -> Option<Self> {
        KeyValueStore::open_default().map(Self::new)
    }

    /// Returns the underlying store
    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    /// Returns the store key for a query
    ///
    /// The query is used verbatim: no trimming or case folding, and the empty
    /// query is a key like any other.
    pub fn cache_key(query: &str) -> String {
        format!("{}_{}", CACHE_PREFIX, query)
    }

    /// Returns the cached images for `query`
    ///
    /// A missing entry and an entry that cannot be decoded both read as a miss.
    pub fn get(&self, query: &str) -> Option<Vec<ImageResult>> {
        match self.read(query) {
            Ok(images) => images,
            Err(e) => {
                tracing::debug!(query, error = %e, "Ignoring undecodable cache entry");
                None
            }
        }
    }

    /// Stores the images for `query`, replacing any previous entry
    ///
    /// Persistence failures are logged and otherwise ignored; callers must not
    /// rely on the entry being on disk.
    pub fn put(&mut self, query: &str, images: &[ImageResult]) {
        if let Err(e) = self.write(query, images) {
            tracing::warn!(query, error = %e, "Failed to cache search results");
        }
    }

    /// Removes every cached query and returns how many were removed
    ///
    /// Keys outside the cache namespace are left untouched. If the cache
    /// directory cannot be listed nothing is removed and 0 is returned.
    pub fn clear(&mut self) -> usize {
        match self.store.remove_prefixed(&format!("{}_", CACHE_PREFIX)) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist cache clear");
                0
            }
        }
    }

    fn read(&self, query: &str) -> Result<Option<Vec<ImageResult>>, CacheError> {
        let Some(value) = self.store.get(&Self::cache_key(query)) else {
            return Ok(None);
        };
        let entry: CacheEntry<Vec<ImageResult>> = serde_json::from_value(value)?;
        Ok(Some(entry.images))
    }

    fn write(&mut self, query: &str, images: &[ImageResult]) -> Result<(), CacheError> {
        let entry = CacheEntry {
            images,
            cached_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry)?;
        self.store.set(&Self::cache_key(query), &value)
    }
}
