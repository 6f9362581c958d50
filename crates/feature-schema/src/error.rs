//! Schema Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or validating a schema artifact
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Artifact file could not be read
    #[error("failed to read schema artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for this format
    #[error("failed to parse schema artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact was written by an unknown format revision
    #[error("unsupported schema format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Schema declares no columns
    #[error("schema declares no columns")]
    EmptyColumns,

    /// Same column listed twice
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column cannot be produced by any declared field
    #[error("column {0} does not correspond to any declared field")]
    UnmappedColumn(String),

    /// Field declaration is internally inconsistent
    #[error("field {field}: {reason}")]
    BadField { field: String, reason: String },
}
