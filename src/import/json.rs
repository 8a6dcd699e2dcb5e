use serde::Deserialize;
use std::path::Path;

use super::{has_extension, MeasurementImporter, MeasurementRecord};
use crate::error::{ImportError, Result};

/// Reads a JSON array of measurement records, or a single record object
pub struct JsonImporter;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<MeasurementRecord>),
    One(MeasurementRecord),
}

impl JsonImporter {
    pub fn new() -> Self {
        JsonImporter
    }

    pub fn parse_str(&self, content: &str) -> Result<Vec<MeasurementRecord>> {
        let parsed: OneOrMany =
            serde_json::from_str(content).map_err(|e| ImportError::ParseError {
                format: "JSON".to_string(),
                reason: e.to_string(),
            })?;

        Ok(match parsed {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![record],
        })
    }
}

impl Default for JsonImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementImporter for JsonImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "json")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<MeasurementRecord>> {
        let content = std::fs::read_to_string(file_path).map_err(ImportError::Io)?;
        self.parse_str(&content)
    }

    fn format_name(&self) -> &'static str {
        "JSON"
    }
}
