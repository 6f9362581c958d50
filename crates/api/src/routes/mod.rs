//! Route Handlers

pub mod apps;
pub mod predict;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON error payload shared by all routes
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps domain failures onto HTTP statuses
#[derive(Debug)]
pub enum ApiError {
    /// No app with the requested name is configured
    UnknownApp(String),
    /// Submission failed validation; the user can fix and resubmit
    Validation(String),
    /// Model execution failed
    Inference(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownApp(name) => {
                (StatusCode::NOT_FOUND, format!("unknown app: {}", name))
            }
            ApiError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Inference(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
