//! Pre-trained Model Artifacts
//!
//! Loads serialized tree-ensemble models and exposes a single predict
//! capability. Artifacts are produced at training time and read-only here.

mod model;
mod tree;

pub use model::{ModelArtifact, ModelKind, ModelOutput, FORMAT_VERSION};
pub use tree::{DecisionTree, Node};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or evaluating a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact file could not be read
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for this format
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact was written by an unknown format revision
    #[error("unsupported model format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Row width does not match the trained feature count
    #[error("invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },

    /// Artifact violates a structural invariant
    #[error("malformed model: {0}")]
    Malformed(String),
}
