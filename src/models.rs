//! Data models for extracted sound pages.
//!
//! - [`MediaRecord`]: everything pulled out of one sound page
//! - [`FormatEntry`]: a single downloadable audio stream
//!
//! Field names follow the info-dict keys the downloading host expects
//! (`format_note`, `upload_date`, ...), so the records serialize straight
//! into the JSON it consumes.

use serde::{Deserialize, Serialize};

/// Channel layout label attached to every stream; the site only serves stereo previews.
pub const STEREO_NOTE: &str = "Stereo";

/// Metadata extracted from a single sound page.
///
/// Built once per page and never mutated afterwards. Only `id`, `title` and
/// at least one entry in `formats` are guaranteed; everything else is
/// best-effort.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaRecord {
    /// Numeric sound id, verbatim from the URL path.
    pub id: String,
    /// Sound title.
    pub title: String,
    /// Plain-text description, markup removed.
    pub description: Option<String>,
    /// Length in seconds.
    pub duration: Option<f64>,
    /// Username of the uploader.
    pub uploader: Option<String>,
    /// Upload date as `YYYYMMDD`.
    pub upload_date: Option<String>,
    /// Tags in document order.
    pub tags: Vec<String>,
    /// Candidate streams, lowest quality first.
    pub formats: Vec<FormatEntry>,
    /// The page the record was extracted from.
    pub webpage_url: String,
}

impl MediaRecord {
    /// The highest-ranked stream, if any.
    pub fn best_format(&self) -> Option<&FormatEntry> {
        self.formats.iter().max_by_key(|f| f.quality)
    }
}

/// One downloadable audio stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatEntry {
    pub url: String,
    /// Always [`STEREO_NOTE`].
    pub format_note: String,
    /// 0-based rank, higher means better fidelity.
    pub quality: i32,
    /// File extension taken from the URL path, e.g. `mp3`.
    pub ext: Option<String>,
}

impl FormatEntry {
    /// Build a stereo entry for `url` at the given rank.
    pub fn stereo(url: impl Into<String>, quality: i32) -> Self {
        let url = url.into();
        let ext = extension_of(&url);
        Self {
            url,
            format_note: STEREO_NOTE.to_string(),
            quality,
            ext,
        }
    }
}

fn extension_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let file = parsed.path_segments()?.next_back()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
