//! Model lifecycle handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::logic::model::OracleStatus;
use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct ReloadResponse {
    status: &'static str,
    model: String,
    features: usize,
    reloaded_at: i64,
}

/// Current loading state of the model oracle
pub async fn status(State(state): State<AppState>) -> Json<OracleStatus> {
    Json(state.oracle.status())
}

/// Force a reload of the model artifact from disk
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let model = state.oracle.reload()?;
    Ok(Json(ReloadResponse {
        status: "success",
        model: model.name.clone(),
        features: model.feature_schema.len(),
        reloaded_at: model.loaded_at.timestamp(),
    }))
}
