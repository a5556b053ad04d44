//! Feature importance handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Serialize)]
pub struct ImportanceResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    importance: Vec<FeatureImportance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Feature importances of the loaded model, highest first
pub async fn importance(State(state): State<AppState>) -> AppResult<Json<ImportanceResponse>> {
    let model = state.oracle.model()?;

    let importances = match &model.feature_importances {
        Some(importances) => importances,
        None => {
            return Ok(Json(ImportanceResponse {
                status: "ok",
                count: None,
                importance: Vec::new(),
                message: Some("Model does not support feature importance"),
            }));
        }
    };

    let mut ranked: Vec<FeatureImportance> = model
        .feature_schema
        .iter()
        .zip(importances.iter())
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance: *importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    Ok(Json(ImportanceResponse {
        status: "success",
        count: Some(ranked.len()),
        importance: ranked,
        message: None,
    }))
}
