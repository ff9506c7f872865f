//! Snapshot export to JSON and CSV.
//!
//! Exports render the current chain contents, not the raw store: ratings are
//! already normalized and order is chain order. JSON documents carry the same
//! field names as the store contract, so an export is also a faithful dump of
//! what a store would hold.

use crate::models::FeedbackRecord;
use crate::storage::StoredFeedback;
use crate::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Supported export formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array of feedback documents.
    Json,
    /// CSV with a header row.
    Csv,
}

impl ExportFormat {
    /// Picks a format from a path's extension (case-insensitive).
    ///
    /// Returns `None` for a missing or unrecognized extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Canonical lowercase name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exports records to the given path, picking the format from its extension.
///
/// Returns the number of records written.
///
/// # Errors
///
/// - [`Error::InvalidInput`] if the extension is missing or unrecognized
/// - [`Error::OperationFailed`] if the file cannot be created or written
pub fn export_to_path<'a, I>(records: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let format = ExportFormat::from_path(path).ok_or_else(|| {
        Error::InvalidInput(format!(
            "unsupported export path '{}': expected a .json or .csv extension",
            path.display()
        ))
    })?;

    let file = File::create(path).map_err(|e| Error::operation("create_export_file", e))?;
    let writer = BufWriter::new(file);
    let written = match format {
        ExportFormat::Json => write_json(records, writer)?,
        ExportFormat::Csv => write_csv(records, writer)?,
    };

    info!(count = written, format = %format, path = %path.display(), "exported feedback");
    Ok(written)
}

/// Writes records as a pretty-printed JSON array of documents.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization or the underlying
/// write fails.
pub fn write_json<'a, I, W>(records: I, mut writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
    W: Write,
{
    let documents: Vec<StoredFeedback> = records
        .into_iter()
        .map(StoredFeedback::from_record)
        .collect();

    serde_json::to_writer_pretty(&mut writer, &documents)
        .map_err(|e| Error::operation("write_json", e))?;
    // A trailing newline keeps the file friendly to line-oriented tools.
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| Error::operation("flush_json", e))?;

    Ok(documents.len())
}

/// Writes records as CSV with a header row.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the underlying write fails.
pub fn write_csv<'a, I, W>(records: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["feedback_id", "customer_name", "feedback_text", "rating"])
        .map_err(|e| Error::operation("write_csv_headers", e))?;

    let mut written = 0usize;
    for record in records {
        csv_writer
            .write_record([
                record.id.as_str(),
                &record.customer,
                &record.text,
                &record.rating.to_string(),
            ])
            .map_err(|e| Error::operation("write_csv", e))?;
        written += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::operation("flush_csv", e))?;
    Ok(written)
}
