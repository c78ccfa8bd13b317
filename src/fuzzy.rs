//! Fuzzy show-name matching
//!
//! Search results are ranked against the query with the Sørensen–Dice
//! coefficient over adjacent character bigrams.

use crate::parsers::SearchResult;
use crate::selection::ShowCandidate;
use std::collections::HashSet;

/// Character appended to single-character strings so they yield one bigram.
const PAD: char = '.';

/// Computes the Dice coefficient of two strings
///
/// The score is `2 * |shared bigrams| / (|bigrams(a)| + |bigrams(b)|)`,
/// always within `0.0..=1.0`. Either string being empty scores `0.0`.
///
/// # Examples
///
/// ```
/// use tvsubtitles::dice_coefficient;
///
/// assert_eq!(dice_coefficient("scrubs", "scrubs"), 1.0);
/// assert_eq!(dice_coefficient("", "scrubs"), 0.0);
/// ```
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_bigrams = bigrams(a);
    let b_bigrams = bigrams(b);

    let overlap = a_bigrams.intersection(&b_bigrams).count();
    overlap as f64 * 2.0 / (a_bigrams.len() + b_bigrams.len()) as f64
}

fn bigrams(text: &str) -> HashSet<(char, char)> {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() == 1 {
        chars.push(PAD);
    }

    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Scores every search result against `term` and orders them best first
///
/// Names are compared lower-cased. The sort is stable, so results with equal
/// scores keep the order the site listed them in.
pub(crate) fn rank_candidates(term: &str, results: Vec<SearchResult>) -> Vec<ShowCandidate> {
    let mut candidates: Vec<ShowCandidate> = results
        .into_iter()
        .map(|result| {
            let score = dice_coefficient(term, &result.name.to_lowercase());
            ShowCandidate {
                id: result.id,
                name: result.name,
                languages: result.languages,
                score,
            }
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}
