use super::{Episode, SearchTerm, Show};
use crate::{Result, TvSubtitlesError};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::rc::{Rc, Weak};

/// One season of a show, holding its episodes by number.
#[derive(Debug)]
pub struct Season {
    pub(super) number: u32,
    pub(super) show: Weak<Show>,
    pub(super) episodes: BTreeMap<u32, Rc<Episode>>,
}

impl Season {
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The show this season belongs to, if it is still alive.
    pub fn show(&self) -> Option<Rc<Show>> {
        self.show.upgrade()
    }

    /// Looks up an episode by number.
    ///
    /// # Errors
    ///
    /// [`TvSubtitlesError::EpisodeNotFound`] if the season has no such episode.
    pub fn episode(&self, number: u32) -> Result<&Rc<Episode>> {
        self.episodes
            .get(&number)
            .ok_or(TvSubtitlesError::EpisodeNotFound(number))
    }

    /// Episodes in ascending order of their number.
    pub fn iter(&self) -> btree_map::Values<'_, u32, Rc<Episode>> {
        self.episodes.values()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Episodes with an attribute containing `term`, ignoring case.
    ///
    /// With a `key`, only the attribute of that name is looked at.
    pub fn search(&self, term: &str, key: Option<&str>) -> Result<Vec<Rc<Episode>>> {
        let term = SearchTerm::new(term, key)?;
        Ok(self.search_with(&term))
    }

    pub(super) fn search_with(&self, term: &SearchTerm) -> Vec<Rc<Episode>> {
        self.episodes
            .values()
            .filter_map(|episode| episode.search_with(term))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Season {
    type Item = &'a Rc<Episode>;
    type IntoIter = btree_map::Values<'a, u32, Rc<Episode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {} (containing {} episodes)", self.number, self.episodes.len())
    }
}
