//! Search results page parser.
use super::{CONTENT_BLOCK, ParseError, child_elements, first_number, selector, text_of};
use scraper::{ElementRef, Html};

/// A show listed on the search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Site-assigned show identifier
    pub id: u32,
    /// Display name as listed
    pub name: String,
    /// Subtitle language codes advertised for the show, in page order
    pub languages: Vec<String>,
}

/// Parses the search results page into stubs, in the order the site lists them.
///
/// A content block without a results list yields no results; a page without
/// the content block at all is rejected.
pub fn parse_search_page(document: &Html) -> Result<Vec<SearchResult>, ParseError> {
    let content_selector = selector(CONTENT_BLOCK)?;
    let content = document
        .select(&content_selector)
        .next()
        .ok_or(ParseError::MissingElement("search content block"))?;

    let list = match child_elements(content).find(|e| e.value().name() == "ul") {
        Some(list) => list,
        None => return Ok(Vec::new()),
    };

    child_elements(list)
        .filter(|e| e.value().name() == "li")
        .map(|li| {
            let entry = child_elements(li)
                .next()
                .ok_or(ParseError::MissingElement("search result entry"))?;
            parse_entry(entry)
        })
        .collect()
}

fn parse_entry(entry: ElementRef<'_>) -> Result<SearchResult, ParseError> {
    let mut link = None;
    let mut languages: Vec<String> = Vec::new();

    for element in child_elements(entry) {
        match element.value().name() {
            "a" => {
                let href = element.value().attr("href").unwrap_or_default();
                let id = first_number("show id", href)?;
                link = Some((id, text_of(element).trim().to_string()));
            }
            "img" => {
                if let Some(alt) = element.value().attr("alt") {
                    if !languages.iter().any(|known| known == alt) {
                        languages.push(alt.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    let (id, name) = link.ok_or(ParseError::MissingElement("search result link"))?;
    Ok(SearchResult {
        id,
        name,
        languages,
    })
}
