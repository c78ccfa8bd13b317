//! Episode subtitle page parser.
use super::{ParseError, child_elements, child_named, parse_count, selector, text_of};
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use url::Url;

/// Format of the "uploaded" field, e.g. `12.03.09 14:22:10`.
const UPLOADED_FORMAT: &str = "%d.%m.%y %H:%M:%S";

/// Uploader shown for releases posted without an author name.
pub const ANONYMOUS: &str = "anonymous";

/// Metadata for one uploaded subtitle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Title shown for the release
    pub name: String,
    /// Rip label (e.g. `HDTV`)
    pub rip: String,
    /// Release group label
    pub release: String,
    /// Upload time as printed by the site
    pub uploaded: Option<NaiveDateTime>,
    /// Uploader name, [`ANONYMOUS`] when blank
    pub author: String,
    /// Download counter
    pub downloaded: u32,
    /// Positive ratings
    pub good: u32,
    /// Negative ratings
    pub bad: u32,
    /// Direct download link
    pub download_url: String,
}

/// Parses an episode page into releases grouped by language code.
///
/// Within a language releases are ordered by descending `good` rating;
/// releases with equal ratings keep page order.
pub fn parse_episode_page(
    document: &Html,
    base: &Url,
) -> Result<BTreeMap<String, Vec<Release>>, ParseError> {
    let block_selector = selector("div.subtitlen")?;
    let mut by_language: BTreeMap<String, Vec<Release>> = BTreeMap::new();

    for block in document.select(&block_selector) {
        let (language, release) = parse_release(block, base)?;
        by_language.entry(language).or_default().push(release);
    }

    for releases in by_language.values_mut() {
        releases.sort_by(|a, b| b.good.cmp(&a.good));
    }

    Ok(by_language)
}

fn parse_release(block: ElementRef<'_>, base: &Url) -> Result<(String, Release), ParseError> {
    let download_url = download_url(block, base)?;

    let mut name = None;
    let mut language = None;
    let mut release = Release {
        name: String::new(),
        rip: String::new(),
        release: String::new(),
        uploaded: None,
        author: ANONYMOUS.to_string(),
        downloaded: 0,
        good: 0,
        bad: 0,
        download_url,
    };

    for element in child_elements(block) {
        match element.value().name() {
            "div" => {
                if let Some(counters) = child_named(element, "span") {
                    read_rating(counters, &mut release)?;
                }
            }
            "h5" => {
                name = Some(text_of(element).trim().to_string());
                let flag = child_named(element, "img")
                    .and_then(|img| img.value().attr("src"))
                    .ok_or(ParseError::MissingElement("release language flag"))?;
                language = Some(flag_language(flag));
            }
            "p" => read_field(element, &mut release)?,
            _ => {}
        }
    }

    release.name = name.ok_or(ParseError::MissingElement("release title"))?;
    let language = language.ok_or(ParseError::MissingElement("release language flag"))?;
    Ok((language, release))
}

/// The release block sits inside a link to its subtitle page; the download
/// page lives at the same path with `subtitle-` replaced by `download-`.
fn download_url(block: ElementRef<'_>, base: &Url) -> Result<String, ParseError> {
    let href = block
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| parent.value().name() == "a")
        .and_then(|parent| parent.value().attr("href"))
        .ok_or(ParseError::MissingElement("release link"))?;

    let url = base.join(href).map_err(|_| ParseError::InvalidValue {
        field: "release link",
        value: href.to_string(),
    })?;

    Ok(url.as_str().replace("subtitle-", "download-"))
}

fn read_rating(counters: ElementRef<'_>, release: &mut Release) -> Result<(), ParseError> {
    for span in child_elements(counters).filter(|e| e.value().name() == "span") {
        let style: String = span
            .value()
            .attr("style")
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match style.trim_end_matches(';') {
            "color:red" => release.bad = parse_count("bad", &text_of(span))?,
            "color:green" => release.good = parse_count("good", &text_of(span))?,
            _ => {}
        }
    }
    Ok(())
}

fn read_field(paragraph: ElementRef<'_>, release: &mut Release) -> Result<(), ParseError> {
    let value = text_of(paragraph).trim().to_string();

    match paragraph.value().attr("title") {
        Some("rip") => release.rip = value,
        Some("release") => release.release = value,
        Some("uploaded") => {
            let uploaded = NaiveDateTime::parse_from_str(&value, UPLOADED_FORMAT).map_err(|_| {
                ParseError::InvalidValue {
                    field: "uploaded",
                    value: value.clone(),
                }
            })?;
            release.uploaded = Some(uploaded);
        }
        Some("author") => {
            if !value.is_empty() {
                release.author = value;
            }
        }
        Some("downloaded") => release.downloaded = parse_count("downloaded", &value)?,
        _ => {}
    }
    Ok(())
}

/// `images/flags/fr.gif` -> `fr`
fn flag_language(src: &str) -> String {
    let file = src.rsplit('/').next().unwrap_or(src);
    file.split('.').next().unwrap_or(file).to_string()
}
