use super::{AttrValue, Episode, Key, Season, SearchTerm, attr};
use crate::{Result, TvSubtitlesError};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::rc::Rc;

/// A show with all of its seasons.
#[derive(Debug)]
pub struct Show {
    pub(super) id: u32,
    pub(super) attributes: BTreeMap<String, AttrValue>,
    pub(super) seasons: BTreeMap<u32, Rc<Season>>,
}

/// Result of a keyed lookup on a [`Show`].
#[derive(Debug, Clone, Copy)]
pub enum ShowItem<'a> {
    Season(&'a Rc<Season>),
    Attribute(&'a AttrValue),
}

impl<'a> ShowItem<'a> {
    pub fn as_season(&self) -> Option<&'a Rc<Season>> {
        match self {
            ShowItem::Season(season) => Some(season),
            ShowItem::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&'a AttrValue> {
        match self {
            ShowItem::Attribute(value) => Some(value),
            ShowItem::Season(_) => None,
        }
    }
}

impl Show {
    /// Site identifier of the show.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name as the site spells it.
    pub fn name(&self) -> &str {
        self.attributes
            .get(attr::SERIES_NAME)
            .and_then(AttrValue::as_text)
            .unwrap_or_default()
    }

    /// Looks up a season or an attribute.
    ///
    /// Numbers are season numbers. A name is first tried as a season number
    /// and then as an attribute name.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::SeasonNotFound`] for a number that is not a season,
    /// [`TvSubtitlesError::AttributeNotFound`] for any other unknown name.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<ShowItem<'_>> {
        match key.into() {
            Key::Number(number) => self.season(number).map(ShowItem::Season),
            Key::Name(name) => {
                if let Ok(number) = name.trim().parse::<u32>() {
                    return self.season(number).map(ShowItem::Season);
                }
                if let Some(value) = self.attributes.get(name) {
                    return Ok(ShowItem::Attribute(value));
                }
                if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
                    // Too large for a season number, but still meant as one.
                    return Err(TvSubtitlesError::SeasonNotFound(name.to_string()));
                }
                Err(TvSubtitlesError::AttributeNotFound(name.to_string()))
            }
        }
    }

    /// Looks up a season by number.
    pub fn season(&self, number: u32) -> Result<&Rc<Season>> {
        self.seasons
            .get(&number)
            .ok_or_else(|| TvSubtitlesError::SeasonNotFound(number.to_string()))
    }

    /// Looks up a show attribute by name.
    pub fn attribute(&self, name: &str) -> Result<&AttrValue> {
        self.attributes
            .get(name)
            .ok_or_else(|| TvSubtitlesError::AttributeNotFound(name.to_string()))
    }

    /// Show attributes, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Seasons in ascending order of their number.
    pub fn iter(&self) -> btree_map::Values<'_, u32, Rc<Season>> {
        self.seasons.values()
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Episodes of all seasons with an attribute containing `term`, ignoring
    /// case, in season then episode order.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::InvalidArgument`] if `term` is blank.
    pub fn search(&self, term: &str, key: Option<&str>) -> Result<Vec<Rc<Episode>>> {
        let term = SearchTerm::new(term, key)?;
        Ok(self
            .seasons
            .values()
            .flat_map(|season| season.search_with(&term))
            .collect())
    }
}

impl<'a> IntoIterator for &'a Show {
    type Item = &'a Rc<Season>;
    type IntoIter = btree_map::Values<'a, u32, Rc<Season>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Show {} (containing {} seasons)", self.name(), self.seasons.len())
    }
}

#[cfg(test)]
mod tests {
    use super::super::ShowBuilder;
    use super::*;

    fn show() -> Rc<Show> {
        let mut builder = ShowBuilder::new(12);
        builder.set_show_data(attr::SERIES_NAME, "Scrubs");
        builder.set_item(1, 1, attr::EPISODE_NAME, "My First Day");
        builder.set_item(1, 2, attr::EPISODE_NAME, "My Mentor");
        builder.set_item(2, 1, attr::EPISODE_NAME, "My Overkill");
        builder.set_item(2, 2, attr::EPISODE_NAME, "My Nightingale");
        builder.build()
    }

    #[test]
    fn test_get_season_and_attribute() {
        let show = show();
        assert_eq!(show.get(1u32).unwrap().as_season().unwrap().number(), 1);
        assert_eq!(show.get("2").unwrap().as_season().unwrap().number(), 2);
        assert_eq!(
            show.get(attr::SERIES_NAME).unwrap().as_attribute().unwrap().as_text(),
            Some("Scrubs")
        );
        assert_eq!(show.name(), "Scrubs");
        assert_eq!(show.id(), 12);
    }

    #[test]
    fn test_get_missing() {
        let show = show();
        assert!(matches!(show.get(10u32), Err(TvSubtitlesError::SeasonNotFound(n)) if n == "10"));
        assert!(matches!(show.get("10"), Err(TvSubtitlesError::SeasonNotFound(_))));
        assert!(matches!(
            show.get("99999999999999"),
            Err(TvSubtitlesError::SeasonNotFound(_))
        ));
        assert!(matches!(
            show.get("afakeattributething"),
            Err(TvSubtitlesError::AttributeNotFound(name)) if name == "afakeattributething"
        ));
    }

    #[test]
    fn test_iteration_order_and_len() {
        let show = show();
        let numbers: Vec<u32> = show.iter().map(|season| season.number()).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(show.len(), 2);
        assert_eq!(show.to_string(), "Show Scrubs (containing 2 seasons)");
    }

    #[test]
    fn test_search_across_seasons() {
        let show = show();
        let found: Vec<String> = show
            .search("my", Some(attr::EPISODE_NAME))
            .unwrap()
            .iter()
            .map(|episode| episode.name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(found, vec!["My First Day", "My Mentor", "My Overkill", "My Nightingale"]);

        let found = show.search("night", None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), Some("My Nightingale"));

        assert!(matches!(show.search("", None), Err(TvSubtitlesError::InvalidArgument(_))));
    }

    #[test]
    fn test_season_search_and_display() {
        let show = show();
        let season = show.season(1).unwrap();
        assert_eq!(season.to_string(), "Season 1 (containing 2 episodes)");
        assert_eq!(season.search("mentor", None).unwrap().len(), 1);
        assert!(season.search("overkill", None).unwrap().is_empty());
        assert!(matches!(season.episode(30), Err(TvSubtitlesError::EpisodeNotFound(30))));
    }
}
