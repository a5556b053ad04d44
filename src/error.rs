//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::model::ModelError;
use crate::logic::service::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Input errors
    EmptyInput,
    InvalidInput(Vec<String>),

    // Model errors
    ModelUnavailable(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No JSON body provided" }),
            ),
            AppError::InvalidInput(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "status": "invalid_input",
                    "errors": errors
                }),
            ),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "status": "error",
                        "message": msg
                    }),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "status": "error",
                        "message": "Internal server error"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::ModelUnavailable(err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::EmptyInput => AppError::EmptyInput,
            PredictError::Model(inner) => AppError::ModelUnavailable(inner.to_string()),
        }
    }
}
