//! Runtime configuration loaded from an optional YAML file.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! ```yaml
//! base_url: https://freesound.org
//! user_agent: freesound_extract/0.1.0
//! timeout_secs: 30
//! concurrency: 4
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Settings for fetching pages.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Origin pages are fetched from. The sound page path is kept and only
    /// the scheme and host are replaced.
    pub base_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// How many pages the CLI fetches at once.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://freesound.org".to_string(),
            user_agent: format!("freesound_extract/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            concurrency: 4,
        }
    }
}

impl Config {
    /// Load a config file, or the defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(Path::new(path)).await?;
        let config = Self::from_yaml(&raw)?;
        info!(path, base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty file deserializes to a unit value, not a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every fetch fail.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("base_url {:?}: {}", self.base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_url must be http or https, got {}",
                base.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
