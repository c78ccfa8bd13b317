//! A single episode and its attributes.
use super::{AttrValue, LanguageGetter, Season, SearchTerm, attr};
use crate::{Result, TvSubtitlesError};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// One episode of a season.
#[derive(Debug)]
pub struct Episode {
    pub(super) season: Weak<Season>,
    pub(super) attributes: BTreeMap<String, AttrValue>,
}

impl Episode {
    /// The season this episode belongs to, if it is still alive.
    pub fn season(&self) -> Option<Rc<Season>> {
        self.season.upgrade()
    }

    /// Looks up an attribute by name.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::AttributeNotFound`] if the episode has no such
    /// attribute.
    pub fn get(&self, name: &str) -> Result<&AttrValue> {
        self.attributes
            .get(name)
            .ok_or_else(|| TvSubtitlesError::AttributeNotFound(name.to_string()))
    }

    /// Iterates over all attributes, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Episode number within the season.
    pub fn number(&self) -> Option<u32> {
        self.number_attr(attr::EPISODE_NUMBER)
    }

    pub fn season_number(&self) -> Option<u32> {
        self.number_attr(attr::SEASON_NUMBER)
    }

    /// Site identifier of the episode.
    pub fn id(&self) -> Option<u32> {
        self.number_attr(attr::ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get(attr::EPISODE_NAME).and_then(AttrValue::as_text)
    }

    /// Language codes the episode table lists for this episode.
    pub fn available_languages(&self) -> &[String] {
        self.attributes
            .get(attr::AVAILABLE_LANGUAGES)
            .and_then(AttrValue::as_languages)
            .unwrap_or_default()
    }

    /// Deferred release lookup for this episode.
    pub fn languages(&self) -> Result<&LanguageGetter> {
        self.get(attr::LANGUAGES)?
            .as_releases()
            .ok_or_else(|| TvSubtitlesError::AttributeNotFound(attr::LANGUAGES.to_string()))
    }

    /// Returns this episode if any attribute (or the attribute named `key`)
    /// contains `term`, ignoring case.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::InvalidArgument`] if `term` is blank.
    pub fn search(self: &Rc<Self>, term: &str, key: Option<&str>) -> Result<Option<Rc<Episode>>> {
        let term = SearchTerm::new(term, key)?;
        Ok(self.search_with(&term))
    }

    pub(super) fn search_with(self: &Rc<Self>, term: &SearchTerm) -> Option<Rc<Episode>> {
        term.matches(&self.attributes).then(|| Rc::clone(self))
    }

    fn number_attr(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).and_then(AttrValue::as_number)
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {:02}x{:02}",
            self.season_number().unwrap_or(0),
            self.number().unwrap_or(0)
        )?;
        match self.name() {
            Some(name) => write!(f, " - {name}"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(name: Option<&str>) -> Rc<Episode> {
        let mut attributes = BTreeMap::new();
        attributes.insert(attr::SEASON_NUMBER.to_string(), AttrValue::from(1));
        attributes.insert(attr::EPISODE_NUMBER.to_string(), AttrValue::from(4));
        if let Some(name) = name {
            attributes.insert(attr::EPISODE_NAME.to_string(), AttrValue::from(name));
        }
        Rc::new(Episode {
            season: Weak::new(),
            attributes,
        })
    }

    #[test]
    fn test_display() {
        assert_eq!(episode(Some("My Old Lady")).to_string(), "Episode 01x04 - My Old Lady");
        assert_eq!(episode(None).to_string(), "Episode 01x04");
    }

    #[test]
    fn test_missing_attribute() {
        let episode = episode(None);
        assert!(matches!(
            episode.get("afakeattributething"),
            Err(TvSubtitlesError::AttributeNotFound(name)) if name == "afakeattributething"
        ));
        assert!(matches!(
            episode.languages(),
            Err(TvSubtitlesError::AttributeNotFound(_))
        ));
        assert!(episode.available_languages().is_empty());
    }

    #[test]
    fn test_search_returns_self() {
        let episode = episode(Some("An Example"));
        let found = episode.search("examp", None).unwrap().unwrap();
        assert!(Rc::ptr_eq(&found, &episode));

        assert!(episode.search("examp", Some("episodename")).unwrap().is_some());
        assert!(episode.search("examp", Some("seasonnumber")).unwrap().is_none());
        assert!(episode.search("nothing", None).unwrap().is_none());
    }

    #[test]
    fn test_orphaned_episode_has_no_season() {
        assert!(episode(None).season().is_none());
    }
}
