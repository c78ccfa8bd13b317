//! Deferred per-episode subtitle releases.
use crate::parsers::{Release, parse_episode_page};
use crate::site::Site;
use crate::{Result, TvSubtitlesError};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Releases of one episode, grouped by language code.
///
/// Nothing is fetched until releases are first asked for. The episode page is
/// then loaded and parsed once and kept for the lifetime of the getter; a
/// failed load is not remembered and is retried on the next access.
pub struct LanguageGetter {
    site: Rc<Site>,
    episode_id: u32,
    releases: OnceCell<BTreeMap<String, Vec<Release>>>,
}

impl LanguageGetter {
    pub(crate) fn new(site: Rc<Site>, episode_id: u32) -> Self {
        Self {
            site,
            episode_id,
            releases: OnceCell::new(),
        }
    }

    /// The episode these releases belong to.
    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Whether the episode page has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.releases.get().is_some()
    }

    /// Releases in `language`, best rated first.
    ///
    /// # Errors
    ///
    /// Fails with [`TvSubtitlesError::LanguageNotFound`] if the episode has no
    /// release in that language, or with the retrieval/parsing error of the
    /// first load.
    pub fn get(&self, language: &str) -> Result<&[Release]> {
        self.releases()?
            .get(language)
            .map(Vec::as_slice)
            .ok_or_else(|| TvSubtitlesError::LanguageNotFound(language.to_string()))
    }

    /// Language codes with at least one release.
    pub fn languages(&self) -> Result<Vec<&str>> {
        Ok(self.releases()?.keys().map(String::as_str).collect())
    }

    /// All releases, keyed by language code.
    pub fn releases(&self) -> Result<&BTreeMap<String, Vec<Release>>> {
        if let Some(releases) = self.releases.get() {
            return Ok(releases);
        }

        let loaded = self.load()?;
        Ok(self.releases.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<BTreeMap<String, Vec<Release>>> {
        debug!(episode_id = self.episode_id, "Loading languages for episode");
        let url = self.site.urls().episode_url(self.episode_id);
        let document = self.site.document(&url)?;
        Ok(parse_episode_page(&document, self.site.base())?)
    }
}

impl fmt::Debug for LanguageGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageGetter")
            .field("episode_id", &self.episode_id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
