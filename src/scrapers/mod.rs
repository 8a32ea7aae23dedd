//! Page scrapers for audio hosting sites.
//!
//! Each scraper is split into two phases:
//!
//! 1. **Fetching**: download the page HTML ([`fetch_page`])
//! 2. **Extracting**: turn the HTML into a [`MediaRecord`](crate::models::MediaRecord)
//!    with a pure function that performs no I/O
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Freesound | [`freesound`] | HTML scraping | Preview MP3s, low and high quality |

pub mod freesound;

use crate::error::Result;
use reqwest::Client;
use tracing::{info, instrument};

/// Fetch a page and return its body as text.
///
/// Non-2xx responses are turned into [`Error::Http`](crate::error::Error::Http).
/// No retries are attempted.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    info!(bytes = body.len(), "Fetched page");
    Ok(body)
}
