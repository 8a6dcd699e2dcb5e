use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::{has_extension, parse_datetime, MeasurementImporter, MeasurementRecord};
use crate::error::{ImportError, Result};
use crate::models::{Gender, HealthAgeInput};

/// CSV importer with flexible column mapping
///
/// Empty cells are treated as absent. A missing required number is passed through as NaN so
/// the engine rejects it by field name; a missing or unknown gender fails the row here.
pub struct CsvImporter {
    column_mapping: HashMap<String, String>,
}

impl CsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(&mut column_mapping, "id", &["id", "user_id", "userid", "scan_id"]);
        Self::add_mapping(
            &mut column_mapping,
            "measured_at",
            &["measured_at", "measuredat", "timestamp", "date", "scan_date"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "actual_age",
            &["actual_age", "actualage", "age"],
        );
        Self::add_mapping(&mut column_mapping, "gender", &["gender", "sex"]);
        Self::add_mapping(
            &mut column_mapping,
            "height_cm",
            &["height_cm", "heightcm", "height"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "weight_kg",
            &["weight_kg", "weightkg", "weight"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "body_fat_percent",
            &["body_fat_percent", "bodyfatpercent", "body_fat", "bf", "pbf", "fat_percent"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "visceral_fat_level",
            &["visceral_fat_level", "visceralfatlevel", "visceral_fat", "vfl", "vf"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "ffm_kg",
            &["ffm_kg", "ffmkg", "ffm", "fat_free_mass", "lean_mass"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "smm_kg",
            &["smm_kg", "smmkg", "smm", "skeletal_muscle_mass"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "smi",
            &["smi", "skeletal_muscle_index"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "muscle_above_standard",
            &["muscle_above_standard", "muscleabovestandard", "muscle_ok"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    /// Parse CSV measurements from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<MeasurementRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| ImportError::ParseError {
                format: "CSV".to_string(),
                reason: e.to_string(),
            })?
            .clone();

        let columns: Vec<String> = headers
            .iter()
            .map(|header| self.normalize_column_name(header))
            .collect();

        let mut records = Vec::new();

        for (index, row) in reader.records().enumerate() {
            // header occupies line 1
            let line = index + 2;
            let row = row.map_err(|e| ImportError::InvalidRecord {
                line,
                reason: e.to_string(),
            })?;

            records.push(Self::parse_row(&columns, &row, line)?);
        }

        Ok(records)
    }

    fn parse_row(columns: &[String], row: &StringRecord, line: usize) -> Result<MeasurementRecord> {
        let cells: HashMap<&str, &str> = columns
            .iter()
            .zip(row.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| (column.as_str(), value))
            .collect();

        let number = |column: &str| -> std::result::Result<Option<f64>, ImportError> {
            match cells.get(column) {
                None => Ok(None),
                Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
                    ImportError::InvalidRecord {
                        line,
                        reason: format!("{} is not a number: '{}'", column, value),
                    }
                }),
            }
        };

        let gender = match cells.get("gender") {
            Some(value) => value.parse::<Gender>().map_err(|e| ImportError::InvalidRecord {
                line,
                reason: e.to_string(),
            })?,
            None => {
                return Err(ImportError::InvalidRecord {
                    line,
                    reason: "gender is missing".to_string(),
                }
                .into())
            }
        };

        let muscle_above_standard = match cells.get("muscle_above_standard") {
            None => None,
            Some(value) => Some(parse_bool(value).ok_or_else(|| ImportError::InvalidRecord {
                line,
                reason: format!("muscle_above_standard is not a boolean: '{}'", value),
            })?),
        };

        let measured_at = match cells.get("measured_at") {
            None => None,
            Some(value) => Some(parse_datetime(value).ok_or_else(|| {
                ImportError::InvalidRecord {
                    line,
                    reason: format!("measured_at is not a date: '{}'", value),
                }
            })?),
        };

        let input = HealthAgeInput {
            actual_age: number("actual_age")?.unwrap_or(f64::NAN),
            gender,
            height_cm: number("height_cm")?,
            weight_kg: number("weight_kg")?,
            body_fat_percent: number("body_fat_percent")?.unwrap_or(f64::NAN),
            visceral_fat_level: number("visceral_fat_level")?.unwrap_or(f64::NAN),
            ffm_kg: number("ffm_kg")?,
            smm_kg: number("smm_kg")?,
            smi: number("smi")?,
            muscle_above_standard,
        };

        Ok(MeasurementRecord {
            id: cells.get("id").map(|id| id.to_string()),
            measured_at,
            input,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementImporter for CsvImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "csv")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<MeasurementRecord>> {
        let file = std::fs::File::open(file_path).map_err(ImportError::Io)?;
        self.parse_reader(file)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}
