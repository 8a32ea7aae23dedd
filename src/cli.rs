//! Command-line interface definitions for freesound_extract.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Fetch settings can come from a YAML config file; flags given here
//! override it.

use clap::Parser;
use freesound_extract::config::Config;

/// Command-line arguments for the freesound_extract application.
///
/// # Examples
///
/// ```sh
/// # Print one JSON record per line
/// freesound_extract https://freesound.org/people/miklovan/sounds/194503/
///
/// # Write pretty JSON files into ./records
/// freesound_extract -o ./records -p URL1 URL2
///
/// # With a config file and a custom user agent
/// freesound_extract -c config.yaml --user-agent my-tool/1.0 URL
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sound page URLs, e.g. https://freesound.org/people/<user>/sounds/<id>/
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Optional path to config.yaml file
    #[arg(short, long, env = "FREESOUND_EXTRACT_CONFIG")]
    pub config: Option<String>,

    /// Write `<id>.json` files into this directory instead of printing
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Pretty-print JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Print only the best stream URL of each sound
    #[arg(long, conflicts_with = "output_dir")]
    pub get_url: bool,

    /// User-Agent header for page requests
    #[arg(long, env = "FREESOUND_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Number of pages fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl Cli {
    /// Apply flag overrides on top of a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config
    }
}
