//! Ranked dataset handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::logic::ranking::reader::PlanetRecord;
use crate::logic::ranking::{RankRequest, RankedDataset, RankingError, SortOrder};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Serialize)]
pub struct RankResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    total: usize,
    returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    avg_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    habitable_count: Option<usize>,
    planets: Vec<PlanetRecord>,
}

impl RankQuery {
    fn into_request(self) -> RankRequest {
        let defaults = RankRequest::default();
        RankRequest {
            limit: self.limit.unwrap_or(defaults.limit),
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            order: match self.order.as_deref() {
                Some(order) if order.eq_ignore_ascii_case("asc") => SortOrder::Ascending,
                _ => SortOrder::Descending,
            },
        }
    }
}

/// Ranked view of the precomputed dataset
pub async fn rank(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
) -> AppResult<Json<RankResponse>> {
    let request = query.into_request();

    match RankedDataset::load(&state.config.ranked_data_path) {
        Ok(dataset) => {
            let ranking = dataset.rank(&request);
            Ok(Json(RankResponse {
                status: "success",
                message: None,
                total: ranking.total,
                returned: ranking.returned,
                avg_score: ranking.avg_score,
                habitable_count: ranking.habitable_count,
                planets: ranking.planets,
            }))
        }
        Err(error @ (RankingError::DatasetNotFound(_) | RankingError::DatasetEmpty)) => {
            // Missing analytics data degrades to an empty view, not a failure.
            tracing::warn!("Ranked dataset unavailable: {}", error);
            Ok(Json(RankResponse {
                status: "warning",
                message: Some(error.to_string()),
                total: 0,
                returned: 0,
                avg_score: None,
                habitable_count: None,
                planets: Vec::new(),
            }))
        }
        Err(error) => Err(AppError::InternalError(error.to_string())),
    }
}
