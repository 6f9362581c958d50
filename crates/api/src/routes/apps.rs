//! App Catalog Routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use feature_schema::FieldSpec;
use serde::Serialize;

use crate::routes::ApiError;
use crate::AppState;

/// Summary of one configured app
#[derive(Debug, Serialize)]
pub struct AppSummary {
    pub name: String,
    pub title: String,
    pub task: String,
}

/// Response for the app listing endpoint
#[derive(Debug, Serialize)]
pub struct AppListResponse {
    pub count: usize,
    pub apps: Vec<AppSummary>,
}

/// Form metadata for one app
#[derive(Debug, Serialize)]
pub struct AppDetail {
    pub name: String,
    pub title: String,
    pub task: String,
    pub target: String,
    pub fields: Vec<FieldSpec>,
}

/// List configured apps
pub async fn list(State(state): State<Arc<AppState>>) -> Json<AppListResponse> {
    let mut apps: Vec<AppSummary> = state
        .apps
        .iter()
        .map(|(name, entry)| AppSummary {
            name: name.clone(),
            title: entry.title.clone(),
            task: entry.predictor.kind().task_name().to_string(),
        })
        .collect();
    apps.sort_by(|a, b| a.name.cmp(&b.name));

    Json(AppListResponse {
        count: apps.len(),
        apps,
    })
}

/// Describe one app's form fields so a client can render the form
pub async fn describe(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<AppDetail>, ApiError> {
    let entry = state
        .apps
        .get(&name)
        .ok_or_else(|| ApiError::UnknownApp(name.clone()))?;
    let schema = entry.predictor.schema();

    Ok(Json(AppDetail {
        name,
        title: entry.title.clone(),
        task: entry.predictor.kind().task_name().to_string(),
        target: schema.target.clone(),
        fields: schema.fields.clone(),
    }))
}
