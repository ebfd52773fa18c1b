//! File-backed key-value store
//!
//! Provides a `KeyValueStore` that keeps one JSON file per key in a cache
//! directory. Every read goes to disk and every write replaces a single file,
//! so several processes sharing the directory see each other's changes and
//! never overwrite unrelated keys. Features sharing one store keep to their
//! own key prefix.

use directories::ProjectDirs;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

/// Extension of entry files
const ENTRY_EXTENSION: &str = "json";

/// Bytes escaped when a key becomes a file name
///
/// `%` keeps the encoding reversible and `.` keeps the extension unambiguous.
const KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'.')
    .add(b'/')
    .add(b'\\')
    .add(b':')
    .add(b'*')
    .add(b'?')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'|');

/// Errors that can occur while reading or writing cached data
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing an entry file failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Failed to decode cache entry: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Persistent string-keyed store of JSON values
///
/// Entries live in an XDG-compliant cache directory (`~/.cache/chefify/` on
/// Linux) or a caller-supplied directory, one `<encoded key>.json` file each.
/// A missing directory reads as an empty store.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    /// Directory holding the entry files
    dir: PathBuf,
}

impl KeyValueStore {
    /// Returns the XDG cache directory for Chefify
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn default_dir() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "chefify")?;
        Some(project_dirs.cache_dir().to_path_buf())
    }

    /// Opens the store in the default XDG cache directory
    pub fn open_default() -> Option<Self> {
        Self::default_dir().map(Self::open)
    }

    /// Opens the store in a custom directory
    ///
    /// The directory is created lazily on the first write.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        tracing::debug!(dir = %dir.display(), "Opened key-value store");
        Self { dir }
    }

    /// Returns the store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the file holding `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            utf8_percent_encode(key, KEY_ENCODE_SET),
            ENTRY_EXTENSION
        ))
    }

    /// Returns the value stored under `key`
    ///
    /// Missing, unreadable and corrupt entries all read as `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to read store entry");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt store entry");
                None
            }
        }
    }

    /// Returns true if `key` has a value on disk
    pub fn contains_key(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    /// Returns every stored key, sorted
    ///
    /// Files that are not entries (temporary files, subdirectories such as
    /// `logs/`) are skipped.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(key) = decode_entry_name(&entry.file_name().to_string_lossy()) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Stores `value` under `key`, replacing any previous value
    ///
    /// The entry file is written next to its final name and renamed into
    /// place, so readers never see a half-written entry.
    pub fn set(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(key);
        let tmp_path = path.with_extension(format!("{}.tmp", process::id()));
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Removes `key`; returns true if this call deleted it
    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every key starting with `prefix`
    ///
    /// Returns the number of entries this call deleted. Entries removed
    /// concurrently by another process are not counted. Stops at the first
    /// entry that cannot be deleted; entries not yet reached stay readable.
    pub fn remove_prefixed(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut removed = 0;
        for key in self.keys()? {
            if key.starts_with(prefix) && self.remove(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Turns an entry file name back into its key
fn decode_entry_name(name: &str) -> Option<String> {
    let stem = name.strip_suffix(ENTRY_EXTENSION)?.strip_suffix('.')?;
    if stem.contains('.') {
        return None;
    }
    percent_decode_str(stem)
        .decode_utf8()
        .ok()
        .map(|key| key.into_owned())
}
