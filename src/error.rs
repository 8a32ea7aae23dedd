//! Error types for page fetching and metadata extraction.
//!
//! Only two failures come out of the extractor itself:
//! [`Error::InvalidUrl`] when the page URL has the wrong shape, and
//! [`Error::Extraction`] when the title or the primary audio URL is missing.
//! Every other field is optional and never produces an error.

use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL is not a `/people/<user>/sounds/<id>/` page.
    #[error("Invalid sound page URL: {0}")]
    InvalidUrl(String),

    /// A required field could not be located in the page.
    #[error("Unable to extract {field} from sound {id}")]
    Extraction {
        /// Name of the missing field.
        field: &'static str,
        /// Sound id the page belongs to.
        id: String,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error is about the page itself: a URL that is not a
    /// sound page, or a page missing a required field. Transport, IO and
    /// config errors return `false`.
    pub fn is_page_error(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::Extraction { .. })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("Failed to parse config: {}", err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
