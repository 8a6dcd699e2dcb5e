//! Export of health-age results
//!
//! Writes batch outcomes as JSON (full debug block), CSV (one flat row per record) or a
//! human-readable text table.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::batch::BatchSummary;
use crate::error::ExportError;

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" | "table" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Guess the format from an output file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// Render a batch summary in the given format
pub fn render(summary: &BatchSummary, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => json::render(summary),
        ExportFormat::Csv => csv::render(summary),
        ExportFormat::Text => Ok(text::render(summary)),
    }
}

/// Write a batch summary to a file in the given format
pub fn export_summary<P: AsRef<Path>>(
    summary: &BatchSummary,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    let content = render(summary, format)?;
    std::fs::write(&output_path, content)?;

    tracing::info!(
        path = %output_path.as_ref().display(),
        format = ?format,
        records = summary.total,
        "Results exported"
    );

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());

        assert_eq!(
            ExportFormat::from_path(Path::new("out/results.csv")),
            Some(ExportFormat::Csv)
        );
        assert_eq!(ExportFormat::from_path(Path::new("results")), None);
    }

    #[test]
    fn test_export_summary_writes_file() {
        let summary = test_support::sample_summary();
        let temp_file = NamedTempFile::new().unwrap();

        export_summary(&summary, ExportFormat::Csv, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
