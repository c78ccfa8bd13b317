//! Client configuration
//!
//! [`ClientConfig`] holds the plain settings. [`TvSubtitlesBuilder`] adds the
//! pluggable parts (transport and selection strategy) and assembles a
//! [`TvSubtitles`] client.

use crate::cache::CacheStorage;
use crate::selection::{FirstMatch, SelectionStrategy};
use crate::site::{Site, SiteUrls};
use crate::transport::{
    CachedPage, CachedTransport, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpTransport, Transport,
};
use crate::{Result, TvSubtitles};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Name of the page cache below the platform cache directory.
const PAGE_CACHE: &str = "pages";

/// Default lifetime of cached pages (1 day).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where downloaded pages are cached
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Every page is fetched from the site
    Disabled,
    /// The platform cache directory, e.g. `~/.cache/tvsubtitles` on Linux
    #[default]
    Default,
    /// A directory of the caller's choosing
    Directory(PathBuf),
}

/// Plain settings of a [`TvSubtitles`] client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Preferred subtitle language. Stored for callers, the client does not
    /// filter by it.
    pub language: Option<String>,
    pub urls: SiteUrls,
    pub cache: CacheMode,
    /// How long a cached page stays valid; `None` keeps pages forever
    pub cache_ttl: Option<Duration>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            language: None,
            urls: SiteUrls::default(),
            cache: CacheMode::Default,
            cache_ttl: Some(DEFAULT_CACHE_TTL),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builder for [`TvSubtitles`]
///
/// # Examples
///
/// ```no_run
/// use tvsubtitles::{CacheMode, PreferLanguage, TvSubtitles};
///
/// let mut client = TvSubtitles::builder()
///     .language("en")
///     .selection(PreferLanguage::new("en"))
///     .cache(CacheMode::Disabled)
///     .build()?;
///
/// let show = client.show("scrubs")?;
/// println!("{show}");
/// # Ok::<(), tvsubtitles::TvSubtitlesError>(())
/// ```
#[derive(Default)]
pub struct TvSubtitlesBuilder {
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
    selection: Option<Box<dyn SelectionStrategy>>,
}

impl TvSubtitlesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = Some(language.into());
        self
    }

    /// Strategy for picking one show out of several search matches.
    pub fn selection(mut self, selection: impl SelectionStrategy + 'static) -> Self {
        self.selection = Some(Box::new(selection));
        self
    }

    /// Replaces the HTTP transport. The transport is used as given, the page
    /// cache does not apply to it.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.config.cache = cache;
        self
    }

    pub fn cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn urls(mut self, urls: SiteUrls) -> Self {
        self.config.urls = urls;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Assembles the client.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be created, the cache directory cannot
    /// be opened or the base URL is invalid.
    pub fn build(self) -> Result<TvSubtitles> {
        let TvSubtitlesBuilder {
            config,
            transport,
            selection,
        } = self;

        let transport = match transport {
            Some(transport) => transport,
            None => default_transport(&config)?,
        };
        let site = Site::new(transport, config.urls.clone())?;
        let selection = selection.unwrap_or_else(|| Box::new(FirstMatch));

        Ok(TvSubtitles::from_parts(config, Rc::new(site), selection))
    }
}

/// HTTP transport, wrapped in the page cache unless caching is disabled.
fn default_transport(config: &ClientConfig) -> Result<Box<dyn Transport>> {
    let http = HttpTransport::new(&config.user_agent, config.timeout)?;

    let cache: CacheStorage<CachedPage> = match &config.cache {
        CacheMode::Disabled => return Ok(Box::new(http)),
        CacheMode::Default => CacheStorage::open(PAGE_CACHE)?,
        CacheMode::Directory(dir) => CacheStorage::open_at(dir)?,
    };
    debug!(dir = %cache.cache_dir().display(), ttl = ?config.cache_ttl, "Using page cache");

    Ok(Box::new(CachedTransport::new(http, cache, config.cache_ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.language, None);
        assert_eq!(config.cache, CacheMode::Default);
        assert_eq!(config.cache_ttl, Some(DEFAULT_CACHE_TTL));
        assert_eq!(config.urls, SiteUrls::default());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_builder_collects_settings() {
        let builder = TvSubtitlesBuilder::new()
            .language("fr")
            .cache(CacheMode::Disabled)
            .cache_ttl(None)
            .user_agent("test-agent")
            .timeout(Duration::from_secs(5));

        assert_eq!(builder.config.language.as_deref(), Some("fr"));
        assert_eq!(builder.config.cache, CacheMode::Disabled);
        assert_eq!(builder.config.cache_ttl, None);
        assert_eq!(builder.config.user_agent, "test-agent");
        assert_eq!(builder.config.timeout, Duration::from_secs(5));
        assert!(builder.transport.is_none());
    }

    #[test]
    fn test_cache_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("pages");
        let config = ClientConfig {
            cache: CacheMode::Directory(cache_dir.clone()),
            ..ClientConfig::default()
        };

        default_transport(&config).unwrap();
        assert!(cache_dir.is_dir());
    }
}
