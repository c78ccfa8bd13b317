//! Terminal-based show selection
//!
//! Presents the ranked candidates as a menu on stderr and lets the user pick
//! the intended show.

use super::{SelectionStrategy, ShowCandidate};
use crate::TvSubtitlesError;
use dialoguer::Select;
use dialoguer::console::Term;
use std::io;

/// Asks the user to choose among the candidates
///
/// The best ranked candidate is preselected. Escaping the menu aborts the
/// lookup with [`TvSubtitlesError::UserAbort`].
#[derive(Debug, Clone, Default)]
pub struct InteractiveSelection {
    /// Maximum number of candidates listed
    limit: Option<usize>,
}

impl InteractiveSelection {
    /// Creates a selection listing every candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists at most `limit` candidates
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Formats a menu entry for a candidate
    fn label(candidate: &ShowCandidate) -> String {
        if candidate.languages.is_empty() {
            format!("{} (id {})", candidate.name, candidate.id)
        } else {
            format!(
                "{} (id {}) [{}]",
                candidate.name,
                candidate.id,
                candidate.languages.join(", ")
            )
        }
    }
}

impl SelectionStrategy for InteractiveSelection {
    fn select<'a>(
        &self,
        candidates: &'a [ShowCandidate],
    ) -> Result<&'a ShowCandidate, TvSubtitlesError> {
        let shown = &candidates[..self.limit.unwrap_or(candidates.len()).min(candidates.len())];
        if shown.is_empty() {
            return Err(TvSubtitlesError::ShowNotFound(String::new()));
        }

        let labels: Vec<String> = shown.iter().map(Self::label).collect();
        let choice = Select::new()
            .with_prompt("Select a show")
            .items(&labels)
            .default(0)
            .interact_on_opt(&Term::stderr())
            .map_err(|e| TvSubtitlesError::Io(io::Error::other(e.to_string())))?;

        choice
            .and_then(|index| shown.get(index))
            .ok_or(TvSubtitlesError::UserAbort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let mut candidate = ShowCandidate {
            id: 12,
            name: "Scrubs".to_string(),
            languages: vec!["en".to_string(), "fr".to_string()],
            score: 1.0,
        };
        assert_eq!(InteractiveSelection::label(&candidate), "Scrubs (id 12) [en, fr]");

        candidate.languages.clear();
        assert_eq!(InteractiveSelection::label(&candidate), "Scrubs (id 12)");
    }

    #[test]
    fn test_limit_of_zero_shows_nothing() {
        let candidates = vec![ShowCandidate {
            id: 1,
            name: "A".to_string(),
            languages: Vec::new(),
            score: 0.0,
        }];
        assert!(matches!(
            InteractiveSelection::with_limit(0).select(&candidates),
            Err(TvSubtitlesError::ShowNotFound(_))
        ));
    }
}
