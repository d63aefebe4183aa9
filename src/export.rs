use std::path::Path;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::turnaround::TurnaroundRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV file: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the full turnaround table (merged and unmerged closed PRs) as CSV.
/// Labels are joined with `;` into one cell; timestamps are RFC 3339.
/// The write is not atomic.
#[instrument(skip(records), fields(rows = records.len(), path = %path.display()))]
pub fn write_csv(records: &[TurnaroundRecord], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "number",
        "title",
        "user",
        "created_at",
        "closed_at",
        "merged",
        "labels",
        "turnaround_hours",
    ])?;

    for record in records {
        writer.write_record([
            record.number.to_string(),
            record.title.clone(),
            record.author.clone(),
            record.created_at.to_rfc3339(),
            record.closed_at.to_rfc3339(),
            record.merged.to_string(),
            record.labels.join(";"),
            format!("{:.2}", record.turnaround_hours),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    debug!("csv written");
    Ok(())
}
