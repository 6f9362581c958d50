//! Predict Route

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use feature_encoder::{RawInput, RawValue};
use model_artifact::ModelOutput;
use predictor::PredictError;
use serde::Serialize;
use tracing::warn;

use crate::routes::ApiError;
use crate::AppState;

/// Response for one prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub app: String,
    pub prediction: ModelOutput,
    pub latency_us: u64,
}

/// Run one submission through the named app.
///
/// The body is a flat JSON object mapping field names to numbers or option
/// labels, exactly as a rendered form would submit them.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<BTreeMap<String, RawValue>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let entry = state
        .apps
        .get(&name)
        .ok_or_else(|| ApiError::UnknownApp(name.clone()))?;

    let input: RawInput = body.into_iter().collect();

    match entry.predictor.predict(&input) {
        Ok(report) => Ok(Json(PredictResponse {
            app: name,
            prediction: report.output,
            latency_us: report.latency_us,
        })),
        Err(PredictError::Invalid(err)) => {
            warn!("Rejected submission for {:?}: {}", name, err);
            Err(ApiError::Validation(err.to_string()))
        }
        Err(PredictError::Inference(err)) => {
            warn!("Inference failed for {:?}: {}", name, err);
            Err(ApiError::Inference(err.to_string()))
        }
    }
}
