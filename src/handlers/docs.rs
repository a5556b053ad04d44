//! API documentation handler

use axum::Json;
use serde_json::{json, Value};

/// Machine-readable endpoint catalog
pub async fn docs() -> Json<Value> {
    Json(json!({
        "project": "Exoscore - Exoplanet Habitability Scoring API",
        "endpoints": [
            {
                "path": "/",
                "method": "GET",
                "description": "Welcome banner"
            },
            {
                "path": "/health",
                "method": "GET",
                "description": "Service liveness probe"
            },
            {
                "path": "/predict",
                "method": "POST",
                "description": "Score a single exoplanet observation",
                "example_body": {"pl_rade": 1.2, "pl_eqt": 290}
            },
            {
                "path": "/rank",
                "method": "GET",
                "description": "Ranked planets from the precomputed dataset (limit, sort_by, order)"
            },
            {
                "path": "/stats",
                "method": "GET",
                "description": "Aggregate statistics over the ranked dataset"
            },
            {
                "path": "/importance",
                "method": "GET",
                "description": "Feature importances of the loaded model"
            },
            {
                "path": "/model/status",
                "method": "GET",
                "description": "Model oracle loading state"
            },
            {
                "path": "/model/reload",
                "method": "POST",
                "description": "Reload the model artifact from disk"
            },
            {
                "path": "/docs",
                "method": "GET",
                "description": "This endpoint catalog"
            }
        ]
    }))
}
