//! Cached transport implementation
//!
//! This module provides a caching wrapper for transports that stores raw
//! page bodies on disk and serves repeated requests from there.

use super::{RetrievalError, Transport};
use crate::cache::{CacheError, CacheStorage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// A page body as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPage {
    /// The URL the body was fetched from
    pub url: String,
    /// Seconds since the Unix epoch at fetch time
    pub fetched_at: u64,
    /// Raw response body
    pub body: Vec<u8>,
}

/// A caching wrapper for transports
///
/// This transport wraps another transport and caches its responses to avoid
/// redundant network requests. The cache is persistent across runs; entries
/// older than the configured TTL are fetched again.
pub struct CachedTransport<T>
where
    T: Transport,
{
    /// The underlying transport
    transport: T,
    /// Cache storage for page bodies
    cache: CacheStorage<CachedPage>,
    /// Maximum entry age, `None` keeps entries forever
    ttl: Option<Duration>,
}

impl<T> CachedTransport<T>
where
    T: Transport,
{
    /// Creates a new cached transport wrapping the given transport
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let http = HttpTransport::new(DEFAULT_USER_AGENT, Duration::from_secs(30))?;
    /// let cache = CacheStorage::open("pages")?;
    /// let cached = CachedTransport::new(http, cache, Some(Duration::from_secs(86400)));
    /// ```
    pub(crate) fn new(transport: T, cache: CacheStorage<CachedPage>, ttl: Option<Duration>) -> Self {
        Self {
            transport,
            cache,
            ttl,
        }
    }

    /// Caches the pages of `transport` in `dir`, creating it if needed.
    ///
    /// Lets a caller-supplied transport share the on-disk page cache the
    /// default HTTP transport uses.
    pub fn in_directory(transport: T, dir: impl Into<PathBuf>, ttl: Option<Duration>) -> Result<Self, CacheError> {
        Ok(Self::new(transport, CacheStorage::open_at(dir)?, ttl))
    }

    /// Generates a cache key for a request
    ///
    /// The key hashes the URL together with any form fields so that
    /// different POST bodies to the same URL are cached separately.
    fn cache_key(url: &str, form: Option<&[(&str, &str)]>) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(url.as_bytes());
        for (name, value) in form.unwrap_or_default() {
            hasher.update(b"\0");
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    fn is_fresh(&self, page: &CachedPage) -> bool {
        match self.ttl {
            None => true,
            Some(ttl) => now_secs().saturating_sub(page.fetched_at) <= ttl.as_secs(),
        }
    }
}

impl<T> Transport for CachedTransport<T>
where
    T: Transport,
{
    fn fetch(&self, url: &str, form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError> {
        let cache_key = Self::cache_key(url, form);

        // Try to load from cache
        match self.cache.load(&cache_key) {
            Ok(Some(page)) if self.is_fresh(&page) => {
                debug!(url, "Cache hit");
                return Ok(page.body);
            }
            Ok(Some(_)) => debug!(url, "Cache entry expired"),
            Ok(None) => debug!(url, "Cache miss"),
            // Unreadable entries are refetched and overwritten
            Err(e) => warn!(url, error = %e, "Ignoring unreadable cache entry"),
        }

        let body = self.transport.fetch(url, form)?;

        let page = CachedPage {
            url: url.to_string(),
            fetched_at: now_secs(),
            body,
        };
        if let Err(e) = self.cache.store(&cache_key, &page) {
            warn!(url, error = %e, "Failed to store page in cache");
        }

        Ok(page.body)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts fetches and answers with the URL itself.
    struct Echo {
        calls: Cell<usize>,
    }

    impl Transport for Echo {
        fn fetch(&self, url: &str, _form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError> {
            self.calls.set(self.calls.get() + 1);
            Ok(url.as_bytes().to_vec())
        }
    }

    fn cached(dir: &std::path::Path, ttl: Option<Duration>) -> CachedTransport<Echo> {
        CachedTransport::new(
            Echo { calls: Cell::new(0) },
            CacheStorage::open_at(dir).unwrap(),
            ttl,
        )
    }

    #[test]
    fn test_second_fetch_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let transport = cached(dir.path(), None);

        assert_eq!(transport.fetch("http://a/1", None).unwrap(), b"http://a/1");
        assert_eq!(transport.fetch("http://a/1", None).unwrap(), b"http://a/1");
        assert_eq!(transport.transport.calls.get(), 1);

        transport.fetch("http://a/2", None).unwrap();
        assert_eq!(transport.transport.calls.get(), 2);
    }

    #[test]
    fn test_form_data_is_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let transport = cached(dir.path(), None);

        transport.fetch("http://a/search", Some(&[("q", "scrubs")])).unwrap();
        transport.fetch("http://a/search", Some(&[("q", "lost")])).unwrap();
        transport.fetch("http://a/search", Some(&[("q", "scrubs")])).unwrap();
        assert_eq!(transport.transport.calls.get(), 2);
    }

    #[test]
    fn test_expired_entries_are_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let transport = cached(dir.path(), Some(Duration::from_secs(60)));

        let key = CachedTransport::<Echo>::cache_key("http://a/old", None);
        let stale = CachedPage {
            url: "http://a/old".to_string(),
            fetched_at: now_secs() - 3600,
            body: b"stale".to_vec(),
        };
        transport.cache.store(&key, &stale).unwrap();

        assert_eq!(transport.fetch("http://a/old", None).unwrap(), b"http://a/old");
        assert_eq!(transport.transport.calls.get(), 1);
    }

    #[test]
    fn test_in_directory_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("nested").join("pages");
        let transport = CachedTransport::in_directory(Echo { calls: Cell::new(0) }, &pages, None).unwrap();

        transport.fetch("http://a/1", None).unwrap();
        assert!(pages.is_dir());
        assert_eq!(std::fs::read_dir(&pages).unwrap().count(), 1);
    }

    #[test]
    fn test_cache_key_is_stable() {
        let a = CachedTransport::<Echo>::cache_key("http://a", Some(&[("q", "x")]));
        let b = CachedTransport::<Echo>::cache_key("http://a", Some(&[("q", "x")]));
        assert_eq!(a, b);
        assert_ne!(a, CachedTransport::<Echo>::cache_key("http://a", None));
    }
}
