//! Unified error hierarchy for healthage
//!
//! The computation engine only ever fails with `InvalidInput`; the remaining variants belong
//! to the import, export and configuration layers around it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all healthage operations
#[derive(Debug, Error)]
pub enum HealthAgeError {
    /// A required measurement is missing, non-finite or out of range
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Measurement import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Result export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Measurement import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// No importer handles this file
    #[error("Unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Whole-file parsing failed
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// A single record could not be read
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for healthage operations
pub type Result<T> = std::result::Result<T, HealthAgeError>;

impl HealthAgeError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HealthAgeError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HealthAgeError::InvalidInput { .. } => ErrorSeverity::Warning,
            HealthAgeError::Import(ImportError::InvalidRecord { .. }) => ErrorSeverity::Warning,
            HealthAgeError::Import(_) => ErrorSeverity::Error,
            HealthAgeError::Export(_) => ErrorSeverity::Error,
            HealthAgeError::Configuration(_) => ErrorSeverity::Error,
            HealthAgeError::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            HealthAgeError::InvalidInput { field, .. } => {
                format!("Please complete required measurements ({})", field)
            }
            HealthAgeError::Import(ImportError::UnsupportedFormat { path }) => {
                format!(
                    "Cannot read measurements from {}: use a .json or .csv file",
                    path.display()
                )
            }
            HealthAgeError::Import(ImportError::InvalidRecord { line, .. }) => {
                format!("Measurement file has an unreadable row at line {}", line)
            }
            _ => self.to_string(),
        }
    }

    /// Emit this error as a tracing event at the level matching its severity
    pub fn log(&self, message: &str) {
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, severity = ?self.severity(), "{}", message)
            }
            ErrorSeverity::Warning => tracing::warn!(error = %self, "{}", message),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// A single measurement was rejected; the rest of the run can continue
    Warning,
}
