//! Predictor Implementation

use std::path::Path;
use std::time::Instant;

use feature_encoder::{Encoder, RawInput};
use feature_schema::FeatureSchema;
use model_artifact::{ModelArtifact, ModelKind, ModelOutput};
use serde::Serialize;
use tracing::{debug, info};

use crate::{ArtifactError, PredictError};

/// Outcome of one submission
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    /// Scalar or label prediction
    pub output: ModelOutput,
    /// Wall-clock encode + inference time
    pub latency_us: u64,
}

/// One schema + one model, loaded once and immutable for the process life.
///
/// Constructed explicitly and passed into the request path; shared behind
/// `Arc` without locking since nothing mutates after load.
pub struct Predictor {
    schema: FeatureSchema,
    model: ModelArtifact,
}

impl Predictor {
    /// Load and pair both artifacts from disk
    pub fn load(
        schema_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactError> {
        let schema = FeatureSchema::load(schema_path)?;
        let model = ModelArtifact::load(model_path)?;
        Self::from_parts(schema, model)
    }

    /// Pair already-loaded artifacts, checking they belong together
    pub fn from_parts(schema: FeatureSchema, model: ModelArtifact) -> Result<Self, ArtifactError> {
        if schema.training_run != model.training_run {
            return Err(ArtifactError::TrainingRunMismatch {
                schema_run: schema.training_run,
                model_run: model.training_run,
            });
        }
        if schema.width() != model.n_features {
            return Err(ArtifactError::WidthMismatch {
                columns: schema.width(),
                features: model.n_features,
            });
        }
        info!(
            "Predictor ready: target {:?}, {} {} over {} columns",
            schema.target,
            model.n_trees(),
            model.kind.task_name(),
            schema.width()
        );
        Ok(Self { schema, model })
    }

    /// The schema this predictor encodes against
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Task and output layout of the underlying model
    pub fn kind(&self) -> &ModelKind {
        &self.model.kind
    }

    /// Run one submission through encode → predict.
    ///
    /// `PredictError::Invalid` is a validation failure the user can fix by
    /// resubmitting; `PredictError::Inference` is a model-execution failure.
    pub fn predict(&self, input: &RawInput) -> Result<PredictionReport, PredictError> {
        let start = Instant::now();

        let row = Encoder::new(&self.schema).encode(input)?;
        let output = self.model.predict(row.as_slice())?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Prediction completed in {}us", latency_us);

        Ok(PredictionReport { output, latency_us })
    }
}
