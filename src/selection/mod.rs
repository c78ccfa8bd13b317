//! Show selection strategies
//!
//! A name search can match several shows. After the candidates have been
//! ranked by similarity to the searched name, a [`SelectionStrategy`] decides
//! which one the client goes on to fetch.

mod interactive;

pub use interactive::InteractiveSelection;

use crate::TvSubtitlesError;

/// A search result scored against the searched name.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowCandidate {
    /// Site-assigned show identifier
    pub id: u32,
    /// Display name as listed by the site
    pub name: String,
    /// Subtitle language codes advertised for the show
    pub languages: Vec<String>,
    /// Dice similarity to the searched name, `0.0..=1.0`
    pub score: f64,
}

/// Trait for picking one show out of ranked search candidates
///
/// The client only calls this with a non-empty slice ordered best match
/// first; an empty search is reported as
/// [`TvSubtitlesError::ShowNotFound`] before any strategy runs.
///
/// # Examples
///
/// ```
/// use tvsubtitles::{SelectionStrategy, ShowCandidate, TvSubtitlesError};
///
/// /// Picks the candidate with the shortest name.
/// struct Shortest;
///
/// impl SelectionStrategy for Shortest {
///     fn select<'a>(
///         &self,
///         candidates: &'a [ShowCandidate],
///     ) -> Result<&'a ShowCandidate, TvSubtitlesError> {
///         candidates
///             .iter()
///             .min_by_key(|c| c.name.len())
///             .ok_or_else(|| TvSubtitlesError::ShowNotFound(String::new()))
///     }
/// }
/// ```
pub trait SelectionStrategy {
    /// Chooses exactly one of `candidates`
    ///
    /// # Errors
    ///
    /// Implementations may fail, e.g. when a user cancels an interactive
    /// choice ([`TvSubtitlesError::UserAbort`]).
    fn select<'a>(
        &self,
        candidates: &'a [ShowCandidate],
    ) -> Result<&'a ShowCandidate, TvSubtitlesError>;
}

/// Non-interactive default: takes the best ranked candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl SelectionStrategy for FirstMatch {
    fn select<'a>(
        &self,
        candidates: &'a [ShowCandidate],
    ) -> Result<&'a ShowCandidate, TvSubtitlesError> {
        candidates
            .first()
            .ok_or_else(|| TvSubtitlesError::ShowNotFound(String::new()))
    }
}

/// Takes the best ranked candidate offering subtitles in a given language,
/// falling back to the best ranked candidate overall.
#[derive(Debug, Clone)]
pub struct PreferLanguage {
    language: String,
}

impl PreferLanguage {
    /// Creates a strategy preferring shows with `language` subtitles
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl SelectionStrategy for PreferLanguage {
    fn select<'a>(
        &self,
        candidates: &'a [ShowCandidate],
    ) -> Result<&'a ShowCandidate, TvSubtitlesError> {
        candidates
            .iter()
            .find(|candidate| {
                candidate
                    .languages
                    .iter()
                    .any(|code| code.eq_ignore_ascii_case(&self.language))
            })
            .map_or_else(|| FirstMatch.select(candidates), Ok)
    }
}

impl<S: SelectionStrategy + ?Sized> SelectionStrategy for Box<S> {
    fn select<'a>(
        &self,
        candidates: &'a [ShowCandidate],
    ) -> Result<&'a ShowCandidate, TvSubtitlesError> {
        (**self).select(candidates)
    }
}
