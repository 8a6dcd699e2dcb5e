//! Measurement import from body-composition exports
//!
//! Reads `MeasurementRecord`s from JSON and CSV files. Importers only parse; range checks on
//! the required fields are left to the health-age engine so that every rejection names the
//! offending field the same way.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::models::HealthAgeInput;

pub mod csv;
pub mod json;

/// One measurement snapshot as captured by the upstream scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Caller-side identifier (user or scan id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// When the scan was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub input: HealthAgeInput,
}

impl MeasurementRecord {
    pub fn new(input: HealthAgeInput) -> Self {
        Self {
            id: None,
            measured_at: None,
            input,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Trait for reading measurement records from different file formats
pub trait MeasurementImporter {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Read every record in the file
    fn import_file(&self, file_path: &Path) -> Result<Vec<MeasurementRecord>>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;
}

pub(crate) fn has_extension(file_path: &Path, extension: &str) -> bool {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Parse a scan timestamp in any of the layouts scanners commonly export
pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];

    for format in &formats {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive_dt, Utc));
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            let naive_dt = date.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(naive_dt, Utc));
        }
    }

    None
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn MeasurementImporter + Send + Sync>>,
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn MeasurementImporter + Send + Sync>> = vec![
            Box::new(json::JsonImporter::new()),
            Box::new(csv::CsvImporter::new()),
        ];

        Self { importers }
    }

    /// Import a single file, choosing the importer by extension
    pub fn import_file(&self, file_path: &Path) -> Result<Vec<MeasurementRecord>> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportError::UnsupportedFormat {
                path: file_path.to_path_buf(),
            })?;

        let records = importer.import_file(file_path)?;
        info!(
            file = %file_path.display(),
            format = importer.format_name(),
            records = records.len(),
            "Imported measurements"
        );

        Ok(records)
    }

    /// Import every supported file in a directory, skipping files that fail
    pub fn import_directory(&self, dir_path: &Path) -> Result<Vec<MeasurementRecord>> {
        let mut all_records = Vec::new();

        for file_path in self.collect_importable_files(dir_path)? {
            match self.import_file(&file_path) {
                Ok(mut records) => all_records.append(&mut records),
                Err(e) => warn!(file = %file_path.display(), error = %e, "Skipping file"),
            }
        }

        Ok(all_records)
    }

    fn collect_importable_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir_path).map_err(ImportError::Io)? {
            let path = entry.map_err(ImportError::Io)?.path();
            if path.is_file() && self.can_import_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check if this manager can import a given file
    pub fn can_import_file(&self, file_path: &Path) -> bool {
        self.importers.iter().any(|importer| importer.can_import(file_path))
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}
