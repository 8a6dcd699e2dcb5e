use serde::Serialize;

use crate::batch::{BatchOutcome, BatchSummary};
use crate::error::ExportError;

/// Flat per-record row; the debug block is reduced to its headline figures
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    id: &'a str,
    measured_at: String,
    actual_age: f64,
    health_age: Option<i32>,
    delta: Option<i32>,
    is_athletic: Option<bool>,
    athletic_score: Option<f64>,
    metabolic_ratio: Option<f64>,
    expected_ffm_kg: Option<f64>,
    error: &'a str,
}

impl<'a> From<&'a BatchOutcome> for ResultRow<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        let result = outcome.result.as_ref();

        ResultRow {
            id: outcome.id.as_deref().unwrap_or(""),
            measured_at: outcome
                .measured_at
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            actual_age: outcome.actual_age,
            health_age: result.map(|r| r.health_age),
            delta: outcome.delta(),
            is_athletic: result.map(|r| r.is_athletic),
            athletic_score: result.map(|r| r.debug.athletic_score),
            metabolic_ratio: result.and_then(|r| r.debug.metabolic_ratio),
            expected_ffm_kg: result.and_then(|r| r.debug.expected_ffm_kg),
            error: outcome.error.as_deref().unwrap_or(""),
        }
    }
}

/// One CSV row per outcome, header included
pub fn render(summary: &BatchSummary) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for outcome in &summary.outcomes {
        writer
            .serialize(ResultRow::from(outcome))
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ExportError::SerializationError(e.to_string()))
}
