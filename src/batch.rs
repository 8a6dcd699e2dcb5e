//! Parallel evaluation of measurement batches using rayon
//!
//! Each record is independent, so records are scored on a thread pool and the outcomes are
//! returned in input order.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn_span};

use crate::error::{HealthAgeError, Result};
use crate::health_age::compute_health_age;
use crate::import::MeasurementRecord;
use crate::models::HealthAgeResult;
use crate::numeric::round_for_display;

/// Configuration for batch evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of worker threads (None = rayon default, one per CPU)
    pub num_threads: Option<usize>,
    /// Record invalid rows as failed outcomes instead of aborting
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            continue_on_error: true,
        }
    }
}

/// Result of evaluating one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub id: Option<String>,
    pub measured_at: Option<DateTime<Utc>>,
    pub actual_age: f64,
    /// Present when the computation succeeded
    pub result: Option<HealthAgeResult>,
    /// Present when the record was rejected
    pub error: Option<String>,
}

impl BatchOutcome {
    /// Health age minus rounded chronological age
    pub fn delta(&self) -> Option<i32> {
        self.result
            .as_ref()
            .map(|r| r.health_age - round_for_display(self.actual_age))
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// Summary of a batch evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successes that fell back to chronological age for lack of lean-mass data
    pub degraded: usize,
    pub athletic: usize,
    /// Mean of health age minus chronological age over successes
    pub mean_delta: Option<f64>,
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchSummary {
    fn from_outcomes(outcomes: Vec<BatchOutcome>) -> Self {
        let succeeded: Vec<&BatchOutcome> = outcomes.iter().filter(|o| o.is_success()).collect();

        let degraded = succeeded
            .iter()
            .filter_map(|o| o.result.as_ref())
            .filter(|r| r.debug.is_degraded())
            .count();
        let athletic = succeeded
            .iter()
            .filter_map(|o| o.result.as_ref())
            .filter(|r| r.is_athletic)
            .count();

        let deltas: Vec<i32> = succeeded.iter().filter_map(|o| o.delta()).collect();
        let mean_delta = if deltas.is_empty() {
            None
        } else {
            Some(deltas.iter().map(|&d| d as f64).sum::<f64>() / deltas.len() as f64)
        };

        Self {
            total: outcomes.len(),
            succeeded: succeeded.len(),
            failed: outcomes.len() - succeeded.len(),
            degraded,
            athletic,
            mean_delta,
            outcomes,
        }
    }
}

fn evaluate_record(record: &MeasurementRecord) -> (BatchOutcome, Option<HealthAgeError>) {
    let (result, error) = match compute_health_age(&record.input) {
        Ok(result) => (Some(result), None),
        Err(e) => (None, Some(e)),
    };

    let outcome = BatchOutcome {
        id: record.id.clone(),
        measured_at: record.measured_at,
        actual_age: record.input.actual_age,
        result,
        error: error.as_ref().map(|e| e.to_string()),
    };

    (outcome, error)
}

/// Evaluate every record, in parallel, preserving input order
///
/// With `continue_on_error == false` the first rejected record (in input order) aborts the
/// batch with its validation error.
pub fn evaluate_batch(records: &[MeasurementRecord], config: &BatchConfig) -> Result<BatchSummary> {
    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.num_threads {
            builder = builder.num_threads(threads);
        }
        builder
            .build()
            .map_err(|e| HealthAgeError::Configuration(format!("thread pool: {}", e)))?
    };

    let evaluated: Vec<(BatchOutcome, Option<HealthAgeError>)> =
        pool.install(|| records.par_iter().map(evaluate_record).collect());

    let mut outcomes = Vec::with_capacity(evaluated.len());
    for (outcome, error) in evaluated {
        if let Some(error) = error {
            let _record = warn_span!("record", id = ?outcome.id).entered();
            error.log("Measurement rejected");
            if !config.continue_on_error {
                return Err(error);
            }
        }
        outcomes.push(outcome);
    }

    let summary = BatchSummary::from_outcomes(outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        degraded = summary.degraded,
        "Batch evaluated"
    );

    Ok(summary)
}
