//! Export of the breath signal for external reuse
//!
//! Two surfaces: the fixed-name JSON artifact (a flat array of ppb values,
//! no schema or versioning) and a CSV of `(time_min, breath_ppb)` records
//! for plotting tools.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::breath::BreathProfile;

/// Fixed artifact name for the exported breath signal
pub const BREATH_SIGNAL_FILE: &str = "breath_signal.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One row of the CSV series
#[derive(Debug, Clone, Serialize)]
struct BreathRecord {
    time_min: f64,
    breath_ppb: f64,
}

/// Write the breath_ppb sequence as the fixed-name artifact under `dir`.
///
/// Returns the path written.
pub fn write_breath_signal(dir: &Path, profile: &BreathProfile) -> Result<PathBuf, ExportError> {
    let path = dir.join(BREATH_SIGNAL_FILE);
    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(file, profile.ppb())?;
    log::info!("Breath signal exported: {}", path.display());
    Ok(path)
}

/// Write the full `(time_min, breath_ppb)` series as CSV to `path`.
pub fn write_csv(path: &Path, profile: &BreathProfile) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (time_min, breath_ppb) in profile.points() {
        writer.serialize(BreathRecord {
            time_min,
            breath_ppb,
        })?;
    }
    writer.flush()?;
    log::info!("Breath series exported: {}", path.display());
    Ok(())
}
