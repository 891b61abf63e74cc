//! scatterdig-export: Pure format serializers (sans-IO)
//!
//! Converts extracted point sets into text formats. Both formats share
//! one column layout: `pixel_x`, `pixel_y`, `x`, `y`.

pub mod delimited;
pub mod json;

use scatterdig_pipeline::DataPoint;
use serde::{Deserialize, Serialize};

pub use delimited::to_csv;
pub use json::to_json;

/// Errors raised while serializing a point set.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),

    /// JSON serializer failure.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV writer produced bytes that are not UTF-8.
    #[error("CSV export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Output format for a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Pretty-printed array of objects.
    Json,
}

impl ExportFormat {
    /// Serialize `points` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the underlying serializer fails.
    pub fn render(self, points: &[DataPoint]) -> Result<String, ExportError> {
        match self {
            Self::Csv => to_csv(points),
            Self::Json => to_json(points),
        }
    }
}
