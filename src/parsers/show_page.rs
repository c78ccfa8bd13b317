//! Show/season page parser.
//!
//! Every season of a show has its own page. Each page carries the show name,
//! which season it lists, links to the remaining seasons and the episode
//! table for the listed season.
use super::{CONTENT_BLOCK, ParseError, child_elements, child_named, first_number, selector, text_of};
use scraper::{ElementRef, Html};

/// One row of the episode table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    /// Episode number within its season
    pub number: u32,
    /// Site-assigned episode identifier
    pub id: u32,
    /// Episode title
    pub name: String,
    /// Language codes subtitles exist for
    pub languages: Vec<String>,
}

/// Everything one season page reveals about a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowPage {
    /// Display name of the show
    pub name: String,
    /// The season this page lists
    pub season: u32,
    /// Episodes of `season`, ascending by episode number
    pub episodes: Vec<EpisodeRecord>,
    /// All other season numbers, ascending
    pub other_seasons: Vec<u32>,
}

/// Parses a show page.
pub fn parse_show_page(document: &Html) -> Result<ShowPage, ParseError> {
    let name_selector = selector(&format!("{CONTENT_BLOCK} > h2"))?;
    let name = document
        .select(&name_selector)
        .next()
        .map(|h2| text_of(h2).trim().to_string())
        .ok_or(ParseError::MissingElement("show name"))?;

    let seasons_selector = selector(&format!("{CONTENT_BLOCK} > p"))?;
    let seasons = document
        .select(&seasons_selector)
        .next()
        .ok_or(ParseError::MissingElement("season list"))?;
    let (season, other_seasons) = parse_seasons(seasons)?;

    let table_selector = selector("table#table5")?;
    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::MissingElement("episode table"))?;
    let episodes = parse_episodes(table)?;

    Ok(ShowPage {
        name,
        season,
        episodes,
        other_seasons,
    })
}

/// Reads "Season N" labels: the highlighted one is the current season, the
/// linked ones are the others.
fn parse_seasons(paragraph: ElementRef<'_>) -> Result<(u32, Vec<u32>), ParseError> {
    let mut current = None;
    let mut others = Vec::new();

    for element in child_elements(paragraph) {
        match element.value().name() {
            "font" => current = Some(season_number(&text_of(element))?),
            "a" => others.push(season_number(&text_of(element))?),
            _ => {}
        }
    }

    others.sort_unstable();
    others.dedup();

    let current = current.ok_or(ParseError::MissingElement("current season"))?;
    others.retain(|&season| season != current);
    Ok((current, others))
}

fn season_number(label: &str) -> Result<u32, ParseError> {
    label
        .split_whitespace()
        .nth(1)
        .and_then(|number| number.parse().ok())
        .ok_or_else(|| ParseError::InvalidValue {
            field: "season label",
            value: label.trim().to_string(),
        })
}

/// Rows of a table, looking through the `tbody` the HTML parser inserts.
fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|e| e.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

fn parse_episodes(table: ElementRef<'_>) -> Result<Vec<EpisodeRecord>, ParseError> {
    let rows = table_rows(table);
    // First row is the header, the last two hold totals and links.
    if rows.len() < 3 {
        return Ok(Vec::new());
    }

    let mut episodes = Vec::with_capacity(rows.len() - 3);
    for row in &rows[1..rows.len() - 2] {
        // Newest episodes come first on the page.
        episodes.insert(0, parse_episode_row(*row)?);
    }
    Ok(episodes)
}

fn parse_episode_row(row: ElementRef<'_>) -> Result<EpisodeRecord, ParseError> {
    let cells: Vec<ElementRef<'_>> = child_elements(row)
        .filter(|e| e.value().name() == "td")
        .collect();
    if cells.len() < 4 {
        return Err(ParseError::MissingElement("episode table cell"));
    }

    let label = text_of(cells[0]);
    let number = label
        .split('x')
        .nth(1)
        .and_then(|number| number.trim().parse().ok())
        .ok_or_else(|| ParseError::InvalidValue {
            field: "episode label",
            value: label.trim().to_string(),
        })?;

    let link_selector = selector("a")?;
    let link = cells[1]
        .select(&link_selector)
        .next()
        .ok_or(ParseError::MissingElement("episode link"))?;
    let id = first_number("episode id", link.value().attr("href").unwrap_or_default())?;
    let name = text_of(link).trim().to_string();

    let mut languages = Vec::new();
    if let Some(flags) = child_named(cells[3], "nobr") {
        for flag_link in child_elements(flags).filter(|e| e.value().name() == "a") {
            if let Some(alt) = child_named(flag_link, "img").and_then(|img| img.value().attr("alt")) {
                languages.push(alt.to_string());
            }
        }
    }

    Ok(EpisodeRecord {
        number,
        id,
        name,
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, id: u32, name: &str, langs: &[&str]) -> String {
        let flags: String = langs
            .iter()
            .map(|l| format!(r#"<a href="/subtitle-{id}-{l}.html"><img src="images/flags/{l}.gif" alt="{l}"></a>"#))
            .collect();
        format!(
            r#"<tr><td>{label}</td><td><a href="/episode-{id}.html">{name}</a></td><td>9</td><td><nobr>{flags}</nobr></td></tr>"#
        )
    }

    fn page(seasons: &str, rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div>
                <div class="header"></div>
                <div class="menu"></div>
                <div class="main"><div class="content">
                    <h2> Scrubs </h2>
                    <p>{seasons}</p>
                    <table id="table5">
                        <tr><td>Episode</td><td>Name</td><td>Subs</td><td>Languages</td></tr>
                        {rows}
                        <tr><td colspan="4">total</td></tr>
                        <tr><td colspan="4">rss</td></tr>
                    </table>
                </div></div>
            </div></body></html>"#
        ))
    }

    #[test]
    fn test_parse_show_page() {
        let rows = [
            row("1x03", 103, "My Best Friend's Mistake", &["en"]),
            row("1x02", 102, "My Mentor", &["en", "fr"]),
            row("1x01", 101, "My First Day", &["en", "fr", "de"]),
        ]
        .concat();
        let document = page(
            r#"<font>Season 1</font> <a href="/tvshow-12-3.html"><b>Season 3</b></a> <a href="/tvshow-12-2.html"><b>Season 2</b></a>"#,
            &rows,
        );

        let show = parse_show_page(&document).unwrap();
        assert_eq!(show.name, "Scrubs");
        assert_eq!(show.season, 1);
        assert_eq!(show.other_seasons, vec![2, 3]);

        let numbers: Vec<u32> = show.episodes.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(show.episodes[0].id, 101);
        assert_eq!(show.episodes[0].name, "My First Day");
        assert_eq!(show.episodes[0].languages, vec!["en", "fr", "de"]);
        assert_eq!(show.episodes[2].languages, vec!["en"]);
    }

    #[test]
    fn test_single_season_show() {
        let document = page("<font>Season 1</font>", &row("1x01", 5, "Pilot", &[]));
        let show = parse_show_page(&document).unwrap();
        assert!(show.other_seasons.is_empty());
        assert_eq!(show.episodes.len(), 1);
        assert!(show.episodes[0].languages.is_empty());
    }

    #[test]
    fn test_missing_current_season_is_an_error() {
        let document = page(r#"<a href="/tvshow-1-2.html">Season 2</a>"#, "");
        assert!(matches!(
            parse_show_page(&document),
            Err(ParseError::MissingElement("current season"))
        ));
    }

    #[test]
    fn test_bad_episode_label_is_an_error() {
        let document = page("<font>Season 1</font>", &row("special", 5, "Pilot", &[]));
        assert!(matches!(
            parse_show_page(&document),
            Err(ParseError::InvalidValue { field: "episode label", .. })
        ));
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let document = Html::parse_document(
            r#"<html><body><div><div></div><div></div><div><div>
                <h2>Scrubs</h2><p><font>Season 1</font></p>
            </div></div></div></body></html>"#,
        );
        assert!(matches!(
            parse_show_page(&document),
            Err(ParseError::MissingElement("episode table"))
        ));
    }
}
