//! Cache module for storing search results on disk
//!
//! This module provides a file-backed key-value store and the query-keyed image
//! cache built on top of it. Cached searches never expire, and a cache entry
//! that cannot be read is treated as a miss so the caller falls back to the
//! network.

mod images;
mod store;

pub use images::{ImageCache, CACHE_PREFIX};
pub use store::{CacheError, KeyValueStore};
