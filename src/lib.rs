//! tvsubtitles - Browse the shows and subtitles listed on tvsubtitles.net
//!
//! This library looks up a show by name or id, loads every season page of
//! it and exposes the result as a read-only tree of shows, seasons and
//! episodes. Subtitle releases of an episode are only loaded when asked for.
//!
//! # Examples
//!
//! ```no_run
//! use tvsubtitles::TvSubtitles;
//!
//! let mut client = TvSubtitles::new();
//! let show = client.show("scrubs")?;
//! let episode = show.season(1)?.episode(4)?;
//! println!("{episode}");
//!
//! for release in episode.languages()?.get("en")? {
//!     println!("{} ({} good)", release.name, release.good);
//! }
//! # Ok::<(), tvsubtitles::TvSubtitlesError>(())
//! ```

mod cache;
mod config;
mod decode;
mod fuzzy;
mod model;
mod parsers;
mod selection;
mod site;
mod transport;

use fuzzy::rank_candidates;
use model::ShowBuilder;
use parsers::{ShowPage, parse_search_page, parse_show_page};
use site::Site;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

// Re-export error types
pub use cache::CacheError;
pub use decode::DecodeError;
pub use parsers::ParseError;
pub use transport::RetrievalError;

pub use config::{CacheMode, ClientConfig, DEFAULT_CACHE_TTL, TvSubtitlesBuilder};
pub use decode::decode_html;
pub use fuzzy::dice_coefficient;
pub use model::{AttrValue, Episode, Key, LanguageGetter, Season, Show, ShowItem, attr};
pub use parsers::Release;
pub use selection::{FirstMatch, InteractiveSelection, PreferLanguage, SelectionStrategy, ShowCandidate};
pub use site::{DEFAULT_BASE_URL, SiteUrls};
pub use transport::{
    CachedPage, CachedTransport, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpTransport, Transport,
};

/// Top-level error type for tvsubtitles operations
#[derive(Debug, Error)]
pub enum TvSubtitlesError {
    /// A page could not be retrieved
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// A page could not be decoded to text
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// A page did not have the expected layout
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error during cache operations
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No show matched the requested name
    #[error("Show not found: {0}")]
    ShowNotFound(String),

    /// The show has no such season
    #[error("Season not found: {0}")]
    SeasonNotFound(String),

    /// The season has no such episode
    #[error("Episode not found: {0}")]
    EpisodeNotFound(u32),

    /// No attribute of that name exists
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// The episode has no release in that language
    #[error("Language not found: {0}")]
    LanguageNotFound(String),

    /// An argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The user cancelled an interactive selection
    #[error("Aborted by user")]
    UserAbort,
}

pub type Result<T> = std::result::Result<T, TvSubtitlesError>;

/// How a show is requested: by the name to search for, or by its site id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowKey {
    Name(String),
    Id(u32),
}

impl From<&str> for ShowKey {
    fn from(name: &str) -> Self {
        ShowKey::Name(name.to_string())
    }
}

impl From<String> for ShowKey {
    fn from(name: String) -> Self {
        ShowKey::Name(name)
    }
}

impl From<&String> for ShowKey {
    fn from(name: &String) -> Self {
        ShowKey::Name(name.clone())
    }
}

impl From<u32> for ShowKey {
    fn from(id: u32) -> Self {
        ShowKey::Id(id)
    }
}

impl fmt::Display for ShowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowKey::Name(name) => f.write_str(name),
            ShowKey::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Client for tvsubtitles.net
///
/// Shows are fetched on first request and kept for the lifetime of the
/// client, so asking for the same show again returns the same [`Show`]
/// without touching the network. Names that resolved to a show are
/// remembered as well.
///
/// The client and the shows it hands out are single-threaded.
pub struct TvSubtitles {
    config: ClientConfig,
    site: Rc<Site>,
    selection: Box<dyn SelectionStrategy>,
    shows: HashMap<u32, Rc<Show>>,
    corrections: HashMap<String, u32>,
}

impl TvSubtitles {
    /// Client with default settings, without a page cache.
    pub fn new() -> Self {
        let site = Site::with_default_urls(Box::new(HttpTransport::default()));
        let config = ClientConfig {
            cache: CacheMode::Disabled,
            ..ClientConfig::default()
        };

        Self::from_parts(config, Rc::new(site), Box::new(FirstMatch))
    }

    pub fn builder() -> TvSubtitlesBuilder {
        TvSubtitlesBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        site: Rc<Site>,
        selection: Box<dyn SelectionStrategy>,
    ) -> Self {
        Self {
            config,
            site,
            selection,
            shows: HashMap::new(),
            corrections: HashMap::new(),
        }
    }

    /// Preferred subtitle language, if one was configured.
    pub fn language(&self) -> Option<&str> {
        self.config.language.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the show for a name or id, fetching it if needed.
    ///
    /// A name is searched for, the matches are ranked by similarity and the
    /// selection strategy picks one. If fetching any page of the show fails,
    /// nothing about it is kept and the next request starts over.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::ShowNotFound`] if a name search has no results,
    /// otherwise the retrieval, decoding or parsing error of the failed page.
    pub fn show(&mut self, key: impl Into<ShowKey>) -> Result<Rc<Show>> {
        match key.into() {
            ShowKey::Id(id) => self.show_by_id(id),
            ShowKey::Name(name) => self.show_by_name(&name),
        }
    }

    /// Searches the site and ranks the results against `term`, best first.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::InvalidArgument`] if `term` is blank.
    pub fn search(&self, term: &str) -> Result<Vec<ShowCandidate>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(TvSubtitlesError::InvalidArgument(
                "must supply a show name to search for".to_string(),
            ));
        }

        debug!(term = %term, "Searching for show");
        let url = self.site.urls().search_url(&term);
        let document = self.site.document(&url)?;
        let results = parse_search_page(&document)?;

        Ok(rank_candidates(&term, results))
    }

    fn show_by_name(&mut self, name: &str) -> Result<Rc<Show>> {
        let normalized = name.trim().to_lowercase();

        if let Some(&id) = self.corrections.get(&normalized) {
            debug!(name = %normalized, show_id = id, "Correcting show name from cache");
            return self.show_by_id(id);
        }

        let candidates = self.search(&normalized)?;
        if candidates.is_empty() {
            return Err(TvSubtitlesError::ShowNotFound(name.to_string()));
        }

        let selected = self.selection.select(&candidates)?;
        debug!(
            show_id = selected.id,
            name = %selected.name,
            score = selected.score,
            "Selected series"
        );

        let show = self.show_by_id(selected.id)?;
        self.corrections.insert(normalized, show.id());
        Ok(show)
    }

    fn show_by_id(&mut self, id: u32) -> Result<Rc<Show>> {
        if let Some(show) = self.shows.get(&id) {
            return Ok(Rc::clone(show));
        }

        let show = self.fetch_show(id)?;
        self.shows.insert(id, Rc::clone(&show));
        Ok(show)
    }

    /// Loads every season page of show `id` and builds the show from them.
    ///
    /// All pages are parsed before the first model object is created.
    fn fetch_show(&self, id: u32) -> Result<Rc<Show>> {
        debug!(show_id = id, "Getting show data");

        let first = self.fetch_season(id, 1)?;
        let name = first.name.clone();
        let others = first.other_seasons.clone();

        let mut pages: BTreeMap<u32, ShowPage> = BTreeMap::new();
        pages.insert(first.season, first);
        for season in others {
            if pages.contains_key(&season) {
                continue;
            }
            let page = self.fetch_season(id, season)?;
            pages.insert(season, page);
        }

        let mut builder = ShowBuilder::new(id);
        builder.set_show_data(attr::SERIES_NAME, name);
        builder.set_show_data(attr::ID, id);

        for (season, page) in pages {
            builder.add_season(season);
            for episode in page.episodes {
                let number = episode.number;
                builder.set_item(season, number, attr::SEASON_NUMBER, season);
                builder.set_item(season, number, attr::EPISODE_NUMBER, number);
                builder.set_item(season, number, attr::ID, episode.id);
                builder.set_item(season, number, attr::EPISODE_NAME, episode.name);
                builder.set_item(season, number, attr::AVAILABLE_LANGUAGES, episode.languages);
                builder.set_item(
                    season,
                    number,
                    attr::LANGUAGES,
                    LanguageGetter::new(Rc::clone(&self.site), episode.id),
                );
            }
        }

        let show = builder.build();
        debug!(show_id = id, seasons = show.len(), name = show.name(), "Show loaded");
        Ok(show)
    }

    fn fetch_season(&self, id: u32, season: u32) -> Result<ShowPage> {
        debug!(show_id = id, season, "Getting season");
        let url = self.site.urls().season_url(id, season);
        let document = self.site.document(&url)?;
        Ok(parse_show_page(&document)?)
    }
}

impl Default for TvSubtitles {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TvSubtitles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvSubtitles")
            .field("config", &self.config)
            .field("shows", &self.shows.keys().collect::<Vec<_>>())
            .field("corrections", &self.corrections)
            .finish()
    }
}
