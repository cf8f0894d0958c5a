//! Export of summary metrics to JSON and CSV files

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

use crate::simulation::StatisticsSnapshot;

/// Write `snapshot` as pretty-printed JSON. Parent directories must exist.
pub fn write_json(path: &Path, snapshot: &StatisticsSnapshot) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create metrics file {}", path.display()))?;
    serde_json::to_writer_pretty(file, snapshot)
        .with_context(|| format!("Failed to write JSON metrics to {}", path.display()))?;
    Ok(())
}

/// Write `snapshot` as CSV: one header row and one data row.
/// Parent directories must exist.
pub fn write_csv(path: &Path, snapshot: &StatisticsSnapshot) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    writer
        .serialize(snapshot)
        .with_context(|| format!("Failed to write CSV metrics to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Read back a snapshot written by [`write_json`]
pub fn read_json(path: &Path) -> Result<StatisticsSnapshot> {
    let file =
        File::open(path).with_context(|| format!("Failed to open metrics file {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse JSON metrics from {}", path.display()))
}
