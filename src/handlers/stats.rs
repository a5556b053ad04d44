//! Dataset statistics handler

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::logic::ranking::{compute_stats, DatasetStats, RankedDataset, RankingError};
use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
pub struct StatsResponse {
    status: &'static str,
    dataset_health: &'static str,
    #[serde(flatten)]
    stats: DatasetStats,
}

/// Aggregate statistics over the ranked dataset
pub async fn stats(State(state): State<AppState>) -> AppResult<Response> {
    match RankedDataset::load(&state.config.ranked_data_path) {
        Ok(dataset) => {
            let stats = compute_stats(&dataset);
            Ok(Json(StatsResponse {
                status: "success",
                dataset_health: "ok",
                stats,
            })
            .into_response())
        }
        Err(error @ (RankingError::DatasetNotFound(_) | RankingError::DatasetEmpty)) => {
            tracing::warn!("Ranked dataset unavailable: {}", error);
            Ok(Json(json!({
                "status": "warning",
                "message": error.to_string(),
                "total_planets": 0,
                "habitable_count": 0,
                "avg_score": 0,
            }))
            .into_response())
        }
        Err(error) => Err(AppError::InternalError(error.to_string())),
    }
}
