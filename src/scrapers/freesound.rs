//! Freesound sound page scraper.
//!
//! Scrapes the public page of a single sound on [Freesound](https://freesound.org)
//! and pulls out its title, description, duration, uploader, upload date,
//! tags and preview stream URLs.
//!
//! # URL Pattern
//!
//! Sound pages live at `https://freesound.org/people/<user>/sounds/<id>/`,
//! optionally under `www.`.
//!
//! # Required vs optional fields
//!
//! Only the title and the primary preview URL are required; a page missing
//! either yields [`Error::Extraction`]. Every other field degrades to
//! `None` (or an empty tag list) when it is absent or unparsable.
//!
//! # Preview qualities
//!
//! The page only advertises the low-quality preview. Freesound stores the
//! high-quality preview next to it with a `-hq` suffix, so the second format
//! is synthesized from the first without checking that it exists.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{FormatEntry, MediaRecord};
use crate::scrapers::fetch_page;
use crate::utils::{clean_html, float_or_none, truncate_for_log, unified_strdate};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Name used in logs and by hosts dispatching between scrapers.
pub const SOURCE_NAME: &str = "freesound";

const LQ_SUFFIX: &str = "-lq.mp3";
const HQ_SUFFIX: &str = "-hq.mp3";

static VALID_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?freesound\.org/people/[^/?#]+/sounds/(?P<id>\d+)/?(?:[?#].*)?$")
        .unwrap()
});
static SOUND_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/people/[^/]+/sounds/\d+/$").unwrap());
static PROFILE_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/people/([^/]+)/$").unwrap());

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1 > a.bw-link--black[href]").unwrap());
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#soundDescriptionSection p").unwrap());
static DURATION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-duration]").unwrap());
static DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p.text-grey").unwrap());
static PROFILE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href^='/people/']").unwrap());
static TAG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.no-hover.btn-inverse.text-black[href^='/browse/tags/']").unwrap()
});
static MP3_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("[data-mp3]").unwrap());

/// Whether `url` is a Freesound sound page this scraper can handle.
pub fn suitable(url: &str) -> bool {
    VALID_URL.is_match(url)
}

/// Pull the numeric sound id out of a sound page URL.
pub fn match_id(url: &str) -> Result<String> {
    VALID_URL
        .captures(url)
        .map(|caps| caps["id"].to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

/// Extract a [`MediaRecord`] from the HTML of a sound page.
///
/// Pure function over its inputs: the page must already have been fetched.
///
/// # Errors
///
/// - [`Error::InvalidUrl`] if `url` is not a sound page URL
/// - [`Error::Extraction`] if the title or the preview URL is missing
#[instrument(level = "info", skip_all, fields(%url))]
pub fn extract(url: &str, html: &str) -> Result<MediaRecord> {
    let id = match_id(url)?;
    let document = Html::parse_document(html);

    let title = extract_title(&document).ok_or_else(|| {
        warn!(%id, preview = %truncate_for_log(html, 200), "Title not found");
        Error::Extraction { field: "title", id: id.clone() }
    })?;

    let description = extract_description(&document);
    let duration = extract_duration(&document);
    let upload_date = extract_upload_date(&document);
    let uploader = extract_uploader(&document);
    let tags = extract_tags(&document);

    let audio_url = extract_audio_url(&document).ok_or_else(|| {
        warn!(%id, "Preview URL not found");
        Error::Extraction { field: "audio URL", id: id.clone() }
    })?;
    let formats = build_formats(&audio_url);

    debug!(
        has_description = description.is_some(),
        ?duration,
        ?upload_date,
        ?uploader,
        tag_count = tags.len(),
        "Optional fields"
    );
    info!(%id, %title, formats = formats.len(), "Extracted sound page");

    Ok(MediaRecord {
        id,
        title,
        description,
        duration,
        uploader,
        upload_date,
        tags,
        formats,
        webpage_url: url.to_string(),
    })
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .filter(|a| a.value().attr("href").is_some_and(|href| SOUND_HREF.is_match(href)))
        .map(|a| collapse_whitespace(&a))
        .find(|title| !title.is_empty())
}

fn extract_description(document: &Html) -> Option<String> {
    let html = document
        .select(&DESCRIPTION_SELECTOR)
        .map(|p| p.html())
        .collect::<Vec<_>>()
        .join("");
    let text = clean_html(&html);
    (!text.is_empty()).then_some(text)
}

fn extract_duration(document: &Html) -> Option<f64> {
    document
        .select(&DURATION_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("data-duration"))
        .and_then(float_or_none)
}

/// Only the first `p.text-grey` is the header date; later ones belong to
/// the sidebar or comments.
fn extract_upload_date(document: &Html) -> Option<String> {
    document
        .select(&DATE_SELECTOR)
        .next()
        .and_then(|p| unified_strdate(&clean_html(&p.inner_html())))
}

fn extract_uploader(document: &Html) -> Option<String> {
    document
        .select(&PROFILE_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| {
            let caps = PROFILE_HREF.captures(href)?;
            let raw = caps.get(1)?.as_str();
            let name = urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            Some(name)
        })
}

fn extract_tags(document: &Html) -> Vec<String> {
    document
        .select(&TAG_SELECTOR)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .collect()
}

fn extract_audio_url(document: &Html) -> Option<String> {
    document
        .select(&MP3_SELECTOR)
        .filter_map(|el| el.value().attr("data-mp3"))
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Rank the preview URLs: the advertised one first, then the `-hq` variant
/// when the advertised one is the low-quality file.
fn build_formats(audio_url: &str) -> Vec<FormatEntry> {
    let mut urls = vec![audio_url.to_string()];
    if audio_url.contains(LQ_SUFFIX) {
        urls.push(audio_url.replace(LQ_SUFFIX, HQ_SUFFIX));
    }
    urls.into_iter()
        .enumerate()
        .map(|(quality, url)| FormatEntry::stereo(url, quality as i32))
        .collect()
}

fn collapse_whitespace(element: &ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Fetches sound pages and runs [`extract`] on them.
pub struct FreesoundExtractor {
    client: Client,
    config: Config,
}

impl FreesoundExtractor {
    /// Build an extractor with an HTTP client configured from `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Settings the extractor was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the page for `url` is actually fetched from: the sound page
    /// path and query on top of the configured `base_url`.
    pub fn fetch_url(&self, url: &str) -> Result<Url> {
        let page = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
        let base = Url::parse(&self.config.base_url)
            .map_err(|e| Error::Config(format!("base_url {:?}: {}", self.config.base_url, e)))?;
        let mut target = base
            .join(page.path())
            .map_err(|_| Error::InvalidUrl(url.to_string()))?;
        target.set_query(page.query());
        Ok(target)
    }

    /// Fetch a sound page and extract its record.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract_url(&self, url: &str) -> Result<MediaRecord> {
        let id = match_id(url)?;
        let target = self.fetch_url(url)?;
        debug!(source = SOURCE_NAME, %id, fetch_url = %target, "Fetching sound page");
        let html = fetch_page(&self.client, target.as_str()).await?;
        extract(url, &html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://freesound.org/people/tester/sounds/42/";

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>t</title></head><body>{body}</body></html>")
    }

    fn minimal(extra: &str) -> String {
        page(&format!(
            r#"<h1><a class="bw-link--black" href="/people/tester/sounds/42/">A Sound</a></h1>
            <div data-mp3="https://cdn.freesound.org/previews/0/42_1-lq.mp3"></div>{extra}"#
        ))
    }

    #[test]
    fn test_suitable_urls() {
        assert!(suitable("https://freesound.org/people/Sami_Hiltunen/sounds/703362/"));
        assert!(suitable("http://www.freesound.org/people/miklovan/sounds/194503/"));
        assert!(suitable("https://freesound.org/people/miklovan/sounds/194503"));
        assert!(suitable("https://freesound.org/people/miklovan/sounds/194503/?page=2"));
        assert!(!suitable("https://freesound.org/people/miklovan/"));
        assert!(!suitable("https://freesound.org/people/miklovan/sounds/abc/"));
        assert!(!suitable("https://example.org/people/miklovan/sounds/194503/"));
        assert!(!suitable("https://freesound.org/people/miklovan/sounds/194503/download/"));
    }

    #[test]
    fn test_match_id() {
        assert_eq!(
            match_id("https://www.freesound.org/people/Sami_Hiltunen/sounds/703362/").unwrap(),
            "703362"
        );
        assert!(matches!(
            match_id("https://freesound.org/browse/tags/noise/"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_invalid_url_fails_before_parsing() {
        let err = extract("https://freesound.org/search/?q=gulls", &minimal("")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_minimal_page() {
        let record = extract(URL, &minimal("")).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.title, "A Sound");
        assert_eq!(record.description, None);
        assert_eq!(record.duration, None);
        assert_eq!(record.uploader, None);
        assert_eq!(record.upload_date, None);
        assert!(record.tags.is_empty());
        assert_eq!(record.webpage_url, URL);
    }

    #[test]
    fn test_missing_title_is_fatal() {
        let html = page(r#"<div data-mp3="https://cdn.freesound.org/previews/0/42_1-lq.mp3"></div>"#);
        let err = extract(URL, &html).unwrap_err();
        assert!(matches!(err, Error::Extraction { field: "title", .. }));
    }

    #[test]
    fn test_title_must_link_to_sound_page() {
        let html = page(
            r#"<h1><a class="bw-link--black" href="/people/tester/">tester</a></h1>
            <div data-mp3="https://cdn.freesound.org/previews/0/42_1-lq.mp3"></div>"#,
        );
        assert!(matches!(
            extract(URL, &html),
            Err(Error::Extraction { field: "title", .. })
        ));
    }

    #[test]
    fn test_missing_audio_url_is_fatal() {
        let html = page(r#"<h1><a class="bw-link--black" href="/people/tester/sounds/42/">A Sound</a></h1>"#);
        let err = extract(URL, &html).unwrap_err();
        assert!(matches!(err, Error::Extraction { field: "audio URL", .. }));

        let html = page(
            r#"<h1><a class="bw-link--black" href="/people/tester/sounds/42/">A Sound</a></h1>
            <div data-mp3=""></div>"#,
        );
        assert!(matches!(
            extract(URL, &html),
            Err(Error::Extraction { field: "audio URL", .. })
        ));
    }

    #[test]
    fn test_low_quality_url_gets_high_quality_alternate() {
        let record = extract(URL, &minimal("")).unwrap();
        assert_eq!(record.formats.len(), 2);
        assert_eq!(record.formats[0].url, "https://cdn.freesound.org/previews/0/42_1-lq.mp3");
        assert_eq!(record.formats[0].quality, 0);
        assert_eq!(record.formats[1].url, "https://cdn.freesound.org/previews/0/42_1-hq.mp3");
        assert_eq!(record.formats[1].quality, 1);
        assert!(record.formats.iter().all(|f| f.format_note == "Stereo"));
    }

    #[test]
    fn test_other_url_has_single_format() {
        let html = page(
            r#"<h1><a class="bw-link--black" href="/people/tester/sounds/42/">A Sound</a></h1>
            <div data-mp3="https://cdn.freesound.org/previews/0/42_1.mp3"></div>"#,
        );
        let record = extract(URL, &html).unwrap();
        assert_eq!(record.formats.len(), 1);
        assert_eq!(record.formats[0].quality, 0);
        assert_eq!(record.formats[0].url, "https://cdn.freesound.org/previews/0/42_1.mp3");
    }

    #[test]
    fn test_description_is_plain_text() {
        let record = extract(
            URL,
            &minimal(
                r#"<div id="soundDescriptionSection">
                    <p>  Recorded with a <b>Zoom H4n</b> &amp; windshield. </p>
                    <p>Free to use.</p>
                </div>"#,
            ),
        )
        .unwrap();
        assert_eq!(
            record.description.as_deref(),
            Some("Recorded with a Zoom H4n & windshield.\nFree to use.")
        );
    }

    #[test]
    fn test_empty_description_is_none() {
        let record = extract(URL, &minimal(r#"<div id="soundDescriptionSection"><p> </p></div>"#)).unwrap();
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_unparsable_duration_is_none() {
        let record = extract(URL, &minimal(r#"<div data-duration="unknown"></div>"#)).unwrap();
        assert_eq!(record.duration, None);
    }

    #[test]
    fn test_upload_date_ignores_later_grey_paragraphs() {
        let record = extract(
            URL,
            &minimal(
                r#"<p class="text-grey">some time ago</p>
                <div class="comment"><p class="text-grey">January 2, 2020</p></div>"#,
            ),
        )
        .unwrap();
        assert_eq!(record.upload_date, None);

        let record = extract(
            URL,
            &minimal(
                r#"<p class="text-grey">March 3rd, 2021</p>
                <div class="comment"><p class="text-grey">January 2, 2020</p></div>"#,
            ),
        )
        .unwrap();
        assert_eq!(record.upload_date.as_deref(), Some("20210303"));
    }

    #[test]
    fn test_unparsable_upload_date_is_none() {
        let record = extract(URL, &minimal(r#"<p class="text-grey">some time ago</p>"#)).unwrap();
        assert_eq!(record.upload_date, None);
    }

    #[test]
    fn test_uploader_from_profile_link() {
        let record = extract(
            URL,
            &minimal(
                r#"<a href="/people/tester/sounds/">sounds</a>
                <a href="/people/J%C3%BCrgen/">avatar</a>
                <a href="/people/someone_else/">commenter</a>"#,
            ),
        )
        .unwrap();
        assert_eq!(record.uploader.as_deref(), Some("Jürgen"));
    }

    #[test]
    fn test_tags_in_document_order_with_duplicates() {
        let record = extract(
            URL,
            &minimal(
                r#"<a href="/browse/tags/wind/"  class="no-hover btn-inverse text-black"> wind </a>
                <a href="/browse/tags/noise/" class="btn-inverse">not a tag</a>
                <a href="/browse/tags/noise/"  class="no-hover btn-inverse text-black middle">
                    noise
                </a>
                <a href="/browse/tags/wind/"  class="no-hover btn-inverse text-black">wind</a>"#,
            ),
        )
        .unwrap();
        assert_eq!(record.tags, vec!["wind", "noise", "wind"]);
    }

    #[test]
    fn test_blank_tag_kept_as_empty_string() {
        let record = extract(
            URL,
            &minimal(
                r#"<a href="/browse/tags/rain/"  class="no-hover btn-inverse text-black">rain</a>
                <a href="/browse/tags/x/"  class="no-hover btn-inverse text-black">   </a>"#,
            ),
        )
        .unwrap();
        assert_eq!(record.tags, vec!["rain", ""]);
    }

    #[test]
    fn test_build_formats_replaces_suffix() {
        let formats = build_formats("https://cdn.example/a-lq.mp3");
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[1].url, "https://cdn.example/a-hq.mp3");
        assert_eq!(formats[1].ext.as_deref(), Some("mp3"));

        let formats = build_formats("https://cdn.example/a-lq.ogg");
        assert_eq!(formats.len(), 1);
    }

    #[test]
    fn test_fetch_url_swaps_origin() {
        let extractor = FreesoundExtractor::new(Config {
            base_url: "http://127.0.0.1:8080".to_string(),
            ..Config::default()
        })
        .unwrap();
        let target = extractor
            .fetch_url("https://www.freesound.org/people/miklovan/sounds/194503/?x=1")
            .unwrap();
        assert_eq!(target.as_str(), "http://127.0.0.1:8080/people/miklovan/sounds/194503/?x=1");
    }

    #[test]
    fn test_extractor_keeps_config() {
        let extractor = FreesoundExtractor::new(Config {
            concurrency: 9,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(extractor.config().concurrency, 9);
        assert_eq!(SOURCE_NAME, "freesound");
    }

    #[test]
    fn test_extractor_rejects_bad_config() {
        let result = FreesoundExtractor::new(Config {
            concurrency: 0,
            ..Config::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
