//! # freesound_extract
//!
//! Command-line front end: fetches one or more Freesound sound pages,
//! extracts their metadata and prints JSON records for a downloader.
//!
//! ## Usage
//!
//! ```sh
//! freesound_extract https://freesound.org/people/Sami_Hiltunen/sounds/703362/
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level) so stdout only carries
//! JSON. Failed pages are logged and skipped; the exit status is non-zero
//! only when every page failed.

use clap::Parser;
use freesound_extract::config::Config;
use freesound_extract::outputs::json;
use freesound_extract::{FreesoundExtractor, MediaRecord};
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(urls = ?args.urls, output_dir = ?args.output_dir, "Parsed CLI arguments");

    let config = args.apply(Config::load(args.config.as_deref()).await?);
    let extractor = FreesoundExtractor::new(config)?;
    let concurrency = extractor.config().concurrency;
    info!(count = args.urls.len(), concurrency, "freesound_extract starting up");

    // Pages are independent; `buffered` keeps output in argument order.
    let results: Vec<(String, freesound_extract::Result<MediaRecord>)> = stream::iter(args.urls.clone())
        .map(|url| {
            let extractor = &extractor;
            async move {
                let result = extractor.extract_url(&url).await;
                (url, result)
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let mut succeeded = 0usize;
    for (url, result) in results {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_page_error() => {
                warn!(%url, error = %e, "Page did not contain a usable sound; skipping");
                continue;
            }
            Err(e) => {
                error!(%url, error = %e, "Fetch failed; skipping");
                continue;
            }
        };

        if let Err(e) = emit(&args, &record).await {
            error!(%url, error = %e, "Failed to write record");
            continue;
        }
        succeeded += 1;
    }

    let failed = args.urls.len() - succeeded;
    let elapsed = start_time.elapsed();
    info!(?elapsed, succeeded, failed, "Execution complete");

    if succeeded == 0 {
        return Err(format!("no sound could be extracted from {} URL(s)", args.urls.len()).into());
    }
    Ok(())
}

/// Print or store one record according to the CLI flags.
async fn emit(args: &Cli, record: &MediaRecord) -> freesound_extract::Result<()> {
    if args.get_url {
        if let Some(best) = record.best_format() {
            println!("{}", best.url);
        }
        return Ok(());
    }

    match args.output_dir {
        Some(ref dir) => {
            json::write_record(record, dir, args.pretty).await?;
        }
        None => println!("{}", json::render(record, args.pretty)?),
    }
    Ok(())
}
