// Library interface for healthage
// The engine (numeric, reference, scoring, health_age) is pure; import, batch, export,
// config and logging are the layers the CLI builds around it.

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod health_age;
pub mod import;
pub mod logging;
pub mod models;
pub mod numeric;
pub mod reference;
pub mod scoring;

// Re-export commonly used types for convenience
pub use batch::{evaluate_batch, BatchConfig, BatchOutcome, BatchSummary};
pub use error::{HealthAgeError, Result};
pub use export::ExportFormat;
pub use health_age::{compute_health_age, validate_input};
pub use import::{ImportManager, MeasurementRecord};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use scoring::{
    compute_continuous_scores, compute_is_athletic, compute_muscle_above_standard,
    expected_ffm_with_height,
};
