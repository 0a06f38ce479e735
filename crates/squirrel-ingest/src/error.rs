//! Error types for census data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole load.
///
/// Problems with individual rows or features are not errors; they are
/// reported through [`crate::LoadReport::skipped`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Payload is not valid JSON even after NaN sanitizing.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Records payload parsed but is not a JSON array.
    #[error("expected a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },

    /// GeoJSON payload is not a `FeatureCollection`.
    #[error("expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection { found: String },

    /// Failed to read the merged CSV.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/squirrel_data.json"),
        };
        assert_eq!(
            err.to_string(),
            "input file not found: /data/squirrel_data.json"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: IngestError = json_err.into();
        assert!(matches!(err, IngestError::Json(_)));
    }
}
