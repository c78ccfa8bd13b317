//! Cache storage module
//!
//! This module provides persistent caching functionality using the system's
//! standard cache directory, or a caller-chosen directory. Data is serialized
//! to JSON format for storage.

use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read cached data
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write cached data
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deserialize cached data
    #[error("Failed to deserialize cache file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize data for caching
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A generic cache storage for serializable data
///
/// This structure provides persistent caching of data that implements
/// `Serialize` and `Deserialize`. Each entry is one JSON file named after
/// its identifier.
pub(crate) struct CacheStorage<T> {
    /// The directory where cached data is stored
    cache_dir: PathBuf,
    /// Phantom data for the generic type
    _phantom: PhantomData<T>,
}

impl<T> CacheStorage<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    /// Opens or creates a cache storage with the given name
    ///
    /// The cache will be stored in the system's standard cache directory
    /// under a subdirectory named after the application and the provided name.
    /// The name will be sanitized (lowercased, non-alphanumeric characters
    /// replaced with underscores).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache: CacheStorage<CachedPage> = CacheStorage::open("pages")?;
    /// ```
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let proj_dirs = directories::ProjectDirs::from("net", "tvsubtitles", "tvsubtitles")
            .ok_or(CacheError::CacheDirectoryNotFound)?;

        Self::open_at(proj_dirs.cache_dir().join(sanitize_name(name)))
    }

    /// Opens or creates a cache storage rooted at `dir`
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = dir.into();

        // Create the directory if it doesn't exist
        fs::create_dir_all(&cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
            path: cache_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            cache_dir,
            _phantom: PhantomData,
        })
    }

    /// Loads cached data for the given identifier
    ///
    /// Returns `None` if nothing is stored under the identifier, and an error
    /// if the entry exists but cannot be read or deserialized.
    pub fn load(&self, identifier: &str) -> Result<Option<T>, CacheError> {
        let file_path = self.entry_path(identifier);

        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path).map_err(|e| CacheError::ReadFailed {
            path: file_path.clone(),
            source: e,
        })?;

        let data =
            serde_json::from_str(&content).map_err(|e| CacheError::DeserializationFailed {
                path: file_path,
                source: e,
            })?;

        Ok(Some(data))
    }

    /// Stores data in the cache with the given identifier
    pub fn store(&self, identifier: &str, data: &T) -> Result<(), CacheError> {
        let file_path = self.entry_path(identifier);

        let content = serde_json::to_string(data)?;

        fs::write(&file_path, content).map_err(|e| CacheError::WriteFailed {
            path: file_path,
            source: e,
        })?;

        Ok(())
    }

    /// Returns the path to the cache directory
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, identifier: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", sanitize_name(identifier)))
    }
}

/// Sanitizes a name for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        value: u32,
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Simple"), "simple");
        assert_eq!(sanitize_name("With Spaces"), "with_spaces");
        assert_eq!(sanitize_name("With-Hyphens"), "with-hyphens");
        assert_eq!(sanitize_name("Special!@#$%"), "special_____");
        assert_eq!(sanitize_name("Mixed123ABC"), "mixed123abc");
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache: CacheStorage<Entry> = CacheStorage::open_at(dir.path().join("pages")).unwrap();

        assert!(cache.load("missing").unwrap().is_none());

        cache.store("Some Key", &Entry { value: 42 }).unwrap();
        assert_eq!(cache.load("Some Key").unwrap(), Some(Entry { value: 42 }));
        assert!(cache.cache_dir().join("some_key.json").exists());
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache: CacheStorage<Entry> = CacheStorage::open_at(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        assert!(matches!(
            cache.load("broken"),
            Err(CacheError::DeserializationFailed { .. })
        ));
    }
}
