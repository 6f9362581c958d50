//! Prediction Service
//!
//! Pairs one feature schema with one trained model and runs the
//! encode → predict sequence for each submission.

mod predictor;

pub use predictor::{PredictionReport, Predictor};

use feature_encoder::EncodeError;
use feature_schema::SchemaError;
use model_artifact::ModelError;
use thiserror::Error;
use uuid::Uuid;

/// Fatal artifact problems detected at load time.
///
/// The caller must halt further interaction and surface the diagnostic.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Schema artifact missing, corrupt, or inconsistent
    #[error("schema artifact: {0}")]
    Schema(#[from] SchemaError),

    /// Model artifact missing, corrupt, or inconsistent
    #[error("model artifact: {0}")]
    Model(#[from] ModelError),

    /// Artifacts were not produced by the same training run
    #[error("schema and model come from different training runs ({schema_run} vs {model_run})")]
    TrainingRunMismatch { schema_run: Uuid, model_run: Uuid },

    /// Column count disagrees with the model's feature count
    #[error("schema declares {columns} columns but model expects {features} features")]
    WidthMismatch { columns: usize, features: usize },
}

/// Recoverable per-submission failures.
///
/// The caller reports the failure and lets the user resubmit; no retries,
/// both kinds are deterministic.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Request row failed validation or encoding
    #[error("invalid input: {0}")]
    Invalid(#[from] EncodeError),

    /// Model execution failed
    #[error("inference failed: {0}")]
    Inference(#[from] ModelError),
}
