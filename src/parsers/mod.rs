//! HTML page parsers for the three page layouts of the site.
//!
//! Each parser takes an already parsed [`scraper::Html`] document and turns
//! it into a plain record. Structural elements the layout depends on must be
//! present; optional details (ratings, counters) fall back to defaults.
mod episode;
mod search;
mod show_page;

pub use episode::{Release, parse_episode_page};
pub use search::{SearchResult, parse_search_page};
pub use show_page::{EpisodeRecord, ShowPage, parse_show_page};

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use thiserror::Error;

/// Errors that can occur while extracting data from a page.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An element the page layout requires was not found
    #[error("Expected element not found: {0}")]
    MissingElement(&'static str),

    /// A field was present but its text could not be interpreted
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    /// A CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Path of the main content block shared by the search and show pages
/// (`/html/body/div/div[3]/div`).
const CONTENT_BLOCK: &str = "html > body > div > div:nth-of-type(3) > div";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::InvalidSelector(format!("{css}: {e}")))
}

/// Direct element children, skipping text and comment nodes.
fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

fn child_named<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    child_elements(element).find(|child| child.value().name() == name)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Extracts the first run of decimal digits, as used for ids embedded in links.
fn first_number(field: &'static str, text: &str) -> Result<u32, ParseError> {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ParseError::InvalidValue {
            field,
            value: text.to_string(),
        })
}

fn parse_count(field: &'static str, text: &str) -> Result<u32, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    trimmed.parse().map_err(|_| ParseError::InvalidValue {
        field,
        value: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("id", "/tvshow-12-1.html").unwrap(), 12);
        assert_eq!(first_number("id", "episode-4711.html").unwrap(), 4711);
        assert!(matches!(
            first_number("id", "/about.html"),
            Err(ParseError::InvalidValue { field: "id", .. })
        ));
    }

    #[test]
    fn test_parse_count_defaults_blank_to_zero() {
        assert_eq!(parse_count("good", "").unwrap(), 0);
        assert_eq!(parse_count("good", "  17 ").unwrap(), 17);
        assert!(parse_count("good", "n/a").is_err());
    }

    #[test]
    fn test_child_elements_skips_text() {
        let html = Html::parse_fragment("<p>text <a>one</a> more <b>two</b></p>");
        let p = html.select(&selector("p").unwrap()).next().unwrap();
        let names: Vec<&str> = child_elements(p).map(|e| e.value().name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
