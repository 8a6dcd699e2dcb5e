use crate::batch::BatchSummary;
use crate::error::ExportError;

/// Pretty-printed JSON of the whole summary, including every debug block
pub fn render(summary: &BatchSummary) -> Result<String, ExportError> {
    serde_json::to_string_pretty(summary).map_err(|e| ExportError::SerializationError(e.to_string()))
}
