//! Site addressing and page retrieval
//!
//! [`SiteUrls`] holds the `%s` URL templates of the site. [`Site`] combines
//! them with a [`Transport`] to turn a page request into a parsed document.

use crate::decode::decode_html;
use crate::transport::Transport;
use crate::{Result, TvSubtitlesError};
use scraper::Html;
use std::fmt::Display;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Root of the site; relative links on its pages resolve against this.
pub const DEFAULT_BASE_URL: &str = "http://www.tvsubtitles.net/";

static DEFAULT_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("valid base URL"));

/// URL templates of the site
///
/// Every `%s` is replaced by one argument, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    /// Site root
    pub base: String,
    /// Search page, takes the url-encoded search term
    pub search: String,
    /// Show page for one season, takes the show id and the season number
    pub season: String,
    /// Episode subtitle page, takes the episode id
    pub episode: String,
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self::for_base(DEFAULT_BASE_URL)
    }
}

impl SiteUrls {
    /// Templates for a copy of the site hosted at `base`
    pub fn for_base(base: &str) -> Self {
        let root = base.trim_end_matches('/');
        Self {
            base: format!("{root}/"),
            search: format!("{root}/search.php?q=%s"),
            season: format!("{root}/tvshow-%s-%s.html"),
            episode: format!("{root}/episode-%s.html"),
        }
    }

    /// URL of the search page for `term`
    pub fn search_url(&self, term: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
        fill(&self.search, &[&encoded])
    }

    /// URL of the page listing `season` of show `show_id`
    pub fn season_url(&self, show_id: u32, season: u32) -> String {
        fill(&self.season, &[&show_id, &season])
    }

    /// URL of the subtitle page of episode `episode_id`
    pub fn episode_url(&self, episode_id: u32) -> String {
        fill(&self.episode, &[&episode_id])
    }
}

/// Substitutes `%s` placeholders left to right. Surplus placeholders stay.
fn fill(template: &str, args: &[&dyn Display]) -> String {
    let mut result = String::with_capacity(template.len() + 16);
    let mut rest = template;
    let mut args = args.iter();

    while let Some(pos) = rest.find("%s") {
        let Some(arg) = args.next() else {
            break;
        };
        result.push_str(&rest[..pos]);
        result.push_str(&arg.to_string());
        rest = &rest[pos + 2..];
    }
    result.push_str(rest);
    result
}

/// Fetches pages of the site and parses them into documents.
pub(crate) struct Site {
    transport: Box<dyn Transport>,
    urls: SiteUrls,
    base: Url,
}

impl Site {
    pub fn new(transport: Box<dyn Transport>, urls: SiteUrls) -> Result<Self> {
        let base = Url::parse(&urls.base)
            .map_err(|e| TvSubtitlesError::InvalidArgument(format!("Invalid base URL {}: {e}", urls.base)))?;

        Ok(Self {
            transport,
            urls,
            base,
        })
    }

    /// Site at its default location.
    pub fn with_default_urls(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            urls: SiteUrls::default(),
            base: DEFAULT_BASE.clone(),
        }
    }

    pub fn urls(&self) -> &SiteUrls {
        &self.urls
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Fetches `url`, decodes the body and parses it as HTML.
    pub fn document(&self, url: &str) -> Result<Html> {
        debug!(url, "Loading page");
        let body = self.transport.fetch(url, None)?;
        let text = decode_html(&body)?;
        Ok(Html::parse_document(&text))
    }
}
