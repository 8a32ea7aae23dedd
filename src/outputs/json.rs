//! JSON output of extracted records.
//!
//! Records are either printed (one compact object per line, or pretty
//! printed) or written to `{output_dir}/{id}.json`.

use crate::error::Result;
use crate::models::MediaRecord;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize a record, compact or pretty.
pub fn render(record: &MediaRecord, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}

/// Write a [`MediaRecord`] to `{output_dir}/{id}.json`.
///
/// Creates `output_dir` if needed and overwrites any previous file for the
/// same sound.
///
/// # Returns
///
/// The path that was written.
#[instrument(level = "info", skip_all, fields(%output_dir, id = %record.id))]
pub async fn write_record(record: &MediaRecord, output_dir: &str, pretty: bool) -> Result<PathBuf> {
    let json = render(record, pretty)?;

    info!("Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(output_dir).join(format!("{}.json", record.id));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON record");

    Ok(path)
}
