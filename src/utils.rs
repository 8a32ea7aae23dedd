//! Text helpers shared by the scrapers.
//!
//! - HTML fragment cleanup into plain text
//! - Free-form date normalization into `YYYYMMDD`
//! - Lenient number parsing
//! - String truncation for logging

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*br\s*/?\s*>").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*/\s*p\s*>\s*<\s*p[^>]*>").unwrap());
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());
static COMPACT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());

/// Formats tried in order. Numeric forms are day-first.
const DATE_FORMATS: &[&str] = &[
    "%B %d %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d/%m/%Y",
];

/// Convert an HTML fragment into plain text.
///
/// Line breaks and paragraph boundaries become newlines, tags are dropped,
/// entities are decoded, runs of whitespace inside each line collapse to a
/// single space, and the result is trimmed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<p>a &amp; b</p>"), "a & b");
/// assert_eq!(clean_html("<p>one</p>\n<p>two</p>"), "one\ntwo");
/// ```
pub fn clean_html(fragment: &str) -> String {
    let flattened = fragment.replace('\n', " ");
    let with_breaks = BR_TAG.replace_all(&flattened, "\n");
    let with_paragraphs = PARAGRAPH_BREAK.replace_all(&with_breaks, "\n");

    let document = Html::parse_fragment(&with_paragraphs);
    let text = document.root_element().text().collect::<String>();

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Normalize a human-readable date into `YYYYMMDD`.
///
/// Commas and ordinal suffixes are ignored, so `"September 23rd, 2023"` and
/// `"23 September 2023"` both yield `"20230923"`. A trailing time part is
/// allowed. Returns `None` when nothing matches.
pub fn unified_strdate(raw: &str) -> Option<String> {
    let without_commas = raw.replace(',', " ");
    let without_ordinals = ORDINAL_SUFFIX.replace_all(&without_commas, "$1");
    let cleaned = without_ordinals.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = COMPACT_DATE.captures(&cleaned) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return canonical_date(date);
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(&cleaned, fmt).ok()?;
        let trailing_ok = rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T');
        if trailing_ok { canonical_date(date) } else { None }
    })
}

/// `YYYYMMDD`, or `None` when the year does not fit in four digits.
fn canonical_date(date: NaiveDate) -> Option<String> {
    (0..=9999)
        .contains(&date.year())
        .then(|| date.format("%Y%m%d").to_string())
}

/// Parse a float, yielding `None` for anything that isn't a finite number.
pub fn float_or_none(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary,
/// with an ellipsis and the dropped byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
