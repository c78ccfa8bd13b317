//! In-memory show model
//!
//! Shows own their seasons and seasons own their episodes; the links back up
//! the tree are weak. Everything here is read-only for callers. The client
//! fills the model through the crate-private [`ShowBuilder`] and freezes it
//! before handing out the first reference.
mod builder;
mod episode;
mod languages;
mod season;
mod show;

pub(crate) use builder::ShowBuilder;
pub use episode::Episode;
pub use languages::LanguageGetter;
pub use season::Season;
pub use show::{Show, ShowItem};

use crate::{Result, TvSubtitlesError};
use std::fmt;

/// Attribute names used by the model.
pub mod attr {
    /// Display name of a show
    pub const SERIES_NAME: &str = "seriesname";
    /// Site identifier of a show or episode
    pub const ID: &str = "id";
    /// Season number of an episode
    pub const SEASON_NUMBER: &str = "seasonnumber";
    /// Episode number within its season
    pub const EPISODE_NUMBER: &str = "episodenumber";
    /// Episode title
    pub const EPISODE_NAME: &str = "episodename";
    /// Language codes subtitles exist for
    pub const AVAILABLE_LANGUAGES: &str = "available_languages";
    /// Lazily loaded releases per language
    pub const LANGUAGES: &str = "languages";
}

/// Key for looking something up on a show.
///
/// Numbers address seasons. Names address attributes, except that a name
/// made of digits also addresses a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Number(u32),
    Name(&'a str),
}

impl From<u32> for Key<'_> {
    fn from(number: u32) -> Self {
        Key::Number(number)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Number(number) => write!(f, "{number}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Value of a show or episode attribute.
#[derive(Debug)]
pub enum AttrValue {
    Text(String),
    Number(u32),
    Languages(Vec<String>),
    Releases(LanguageGetter),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            AttrValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_languages(&self) -> Option<&[String]> {
        match self {
            AttrValue::Languages(languages) => Some(languages),
            _ => None,
        }
    }

    pub fn as_releases(&self) -> Option<&LanguageGetter> {
        match self {
            AttrValue::Releases(getter) => Some(getter),
            _ => None,
        }
    }

    /// Text a search term is matched against; the release getter has none,
    /// searching must never trigger a page load.
    fn search_text(&self) -> Option<String> {
        match self {
            AttrValue::Text(text) => Some(text.clone()),
            AttrValue::Number(number) => Some(number.to_string()),
            AttrValue::Languages(languages) => Some(languages.join(", ")),
            AttrValue::Releases(_) => None,
        }
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_string())
    }
}

impl From<u32> for AttrValue {
    fn from(number: u32) -> Self {
        AttrValue::Number(number)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(languages: Vec<String>) -> Self {
        AttrValue::Languages(languages)
    }
}

impl From<LanguageGetter> for AttrValue {
    fn from(getter: LanguageGetter) -> Self {
        AttrValue::Releases(getter)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Releases(getter) => write!(f, "releases of episode {}", getter.episode_id()),
            other => f.write_str(&other.search_text().unwrap_or_default()),
        }
    }
}

/// A validated, lower-cased search request.
#[derive(Debug, Clone)]
pub(crate) struct SearchTerm {
    term: String,
    key: Option<String>,
}

impl SearchTerm {
    /// Rejects a blank term: there is nothing to search for.
    pub fn new(term: &str, key: Option<&str>) -> Result<Self> {
        if term.trim().is_empty() {
            return Err(TvSubtitlesError::InvalidArgument(
                "must supply a term to search for".to_string(),
            ));
        }

        Ok(Self {
            term: term.to_lowercase(),
            key: key.map(str::to_lowercase),
        })
    }

    /// Whether any attribute (or only the one named by the key) contains the term.
    fn matches<'a>(&self, attributes: impl IntoIterator<Item = (&'a String, &'a AttrValue)>) -> bool {
        attributes
            .into_iter()
            .filter(|(name, _)| match &self.key {
                Some(key) => name.to_lowercase() == *key,
                None => true,
            })
            .filter_map(|(_, value)| value.search_text())
            .any(|text| text.to_lowercase().contains(&self.term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn attributes() -> BTreeMap<String, AttrValue> {
        let mut attributes = BTreeMap::new();
        attributes.insert(attr::EPISODE_NAME.to_string(), AttrValue::from("My First Day"));
        attributes.insert(attr::EPISODE_NUMBER.to_string(), AttrValue::from(1));
        attributes.insert(
            attr::AVAILABLE_LANGUAGES.to_string(),
            AttrValue::from(vec!["en".to_string(), "fr".to_string()]),
        );
        attributes
    }

    #[test]
    fn test_blank_term_is_invalid() {
        assert!(matches!(
            SearchTerm::new("", None),
            Err(TvSubtitlesError::InvalidArgument(_))
        ));
        assert!(matches!(
            SearchTerm::new("   ", Some("episodename")),
            Err(TvSubtitlesError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_term_matches_case_insensitively() {
        let attributes = attributes();
        assert!(SearchTerm::new("FIRST day", None).unwrap().matches(&attributes));
        assert!(SearchTerm::new("fr", None).unwrap().matches(&attributes));
        assert!(!SearchTerm::new("mentor", None).unwrap().matches(&attributes));
    }

    #[test]
    fn test_key_limits_the_search() {
        let attributes = attributes();
        assert!(SearchTerm::new("first", Some("EpisodeName")).unwrap().matches(&attributes));
        assert!(!SearchTerm::new("fr", Some("episodename")).unwrap().matches(&attributes));
        assert!(!SearchTerm::new("first", Some("nosuchkey")).unwrap().matches(&attributes));
    }

    #[test]
    fn test_key_from() {
        assert_eq!(Key::from(3), Key::Number(3));
        assert_eq!(Key::from("seriesname"), Key::Name("seriesname"));
        assert_eq!(Key::Number(10).to_string(), "10");
    }

    #[test]
    fn test_attr_value_accessors() {
        assert_eq!(AttrValue::from("x").as_text(), Some("x"));
        assert_eq!(AttrValue::from(4).as_number(), Some(4));
        assert!(AttrValue::from(4).as_text().is_none());
        assert_eq!(AttrValue::from(vec!["en".to_string()]).to_string(), "en");
    }
}
