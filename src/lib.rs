//! # freesound_extract
//!
//! Extracts metadata and preview stream URLs from
//! [Freesound](https://freesound.org) sound pages, producing records in the
//! shape a generic media downloader consumes.
//!
//! ## Architecture
//!
//! 1. **Fetching**: download the sound page ([`scrapers::fetch_page`])
//! 2. **Extracting**: parse the HTML into a [`MediaRecord`]
//!    ([`scrapers::freesound::extract`], pure and side-effect free)
//! 3. **Output**: serialize records as JSON ([`outputs::json`])
//!
//! ```ignore
//! let record = freesound_extract::extract(url, &html)?;
//! println!("{} has {} formats", record.title, record.formats.len());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod utils;

pub use error::{Error, Result};
pub use models::{FormatEntry, MediaRecord};
pub use scrapers::freesound::{FreesoundExtractor, extract};
