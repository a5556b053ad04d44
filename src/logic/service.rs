//! Prediction Service - Request Orchestration
//!
//! Wires the transform, alignment, inference, and fusion stages together for
//! a single observation.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::features::{indices, transform, Observation};
use super::fusion;
use super::model::{align, ModelError, ModelOracle};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Why a prediction request could not be served.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Empty input data provided")]
    EmptyInput,
    #[error(transparent)]
    Model(#[from] ModelError),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Per-component breakdown of a fused score, rounded for the response.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreInsights {
    pub model_probability: f64,
    #[serde(rename = "HSI")]
    pub hsi: f64,
    #[serde(rename = "SCI")]
    pub sci: f64,
    pub orbit_stability: f64,
}

/// Outcome of scoring one observation.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub prediction: u8,
    pub habitability_score: f64,
    pub insights: ScoreInsights,
    pub model_name: String,
}

// ============================================================================
// PREDICTION SERVICE
// ============================================================================

/// Scores observations against the currently loaded model.
#[derive(Clone)]
pub struct PredictionService {
    oracle: Arc<ModelOracle>,
}

impl PredictionService {
    pub fn new(oracle: Arc<ModelOracle>) -> Self {
        Self { oracle }
    }

    /// Score a single observation.
    pub fn predict_planet(
        &self,
        observation: &Observation,
    ) -> Result<PredictionReport, PredictError> {
        if observation.is_empty() {
            return Err(PredictError::EmptyInput);
        }

        let row = transform(observation);
        let hsi = row.get("HSI").copied().unwrap_or(0.0);
        let sci = row.get("SCI").copied().unwrap_or(0.0);
        // The raw field is authoritative for the orbit heuristic.
        let orbit = indices::orbital_stability(observation.numeric("pl_orbper"));

        let model = self.oracle.model()?;
        let aligned = align(&row, &model.feature_schema);
        let probability = model.predict_probability(&aligned);

        let score = fusion::fuse(probability, hsi, sci, orbit);
        let prediction = fusion::decide(score);

        tracing::debug!(
            "Scored observation: p={:.4} hsi={:.4} sci={:.4} orbit={:.4} final={}",
            probability,
            hsi,
            sci,
            orbit,
            score
        );

        Ok(PredictionReport {
            prediction,
            habitability_score: score,
            insights: ScoreInsights {
                model_probability: fusion::round4(probability),
                hsi: fusion::round4(hsi),
                sci: fusion::round4(sci),
                orbit_stability: fusion::round4(orbit),
            },
            model_name: model.name.clone(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn service_with_artifact(doc: &Value) -> (TempDir, PredictionService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, doc.to_string()).unwrap();
        let service = PredictionService::new(Arc::new(ModelOracle::new(path)));
        (dir, service)
    }

    fn observation(value: Value) -> Observation {
        match value {
            Value::Object(map) => Observation::from(map),
            _ => panic!("observation fixtures must be JSON objects"),
        }
    }

    fn earth() -> Observation {
        observation(json!({
            "pl_rade": 1.0,
            "pl_eqt": 288.0,
            "pl_orbper": 365.0,
            "st_teff": 5778.0,
            "st_mass": 1.0,
            "st_rad": 1.0
        }))
    }

    fn friendly_artifact() -> Value {
        json!({
            "kind": "estimator",
            "name": "habitability-logreg",
            "feature_names": ["pl_rade", "pl_eqt", "HSI", "SCI"],
            "model": {
                "family": "logistic_regression",
                "coefficients": [0.1, -0.001, 2.0, 1.0],
                "intercept": -1.0
            }
        })
    }

    #[test]
    fn test_empty_observation_is_rejected() {
        let (_dir, service) = service_with_artifact(&friendly_artifact());
        let err = service.predict_planet(&observation(json!({}))).unwrap_err();
        assert!(matches!(err, PredictError::EmptyInput));
    }

    #[test]
    fn test_earth_is_habitable() {
        let (_dir, service) = service_with_artifact(&friendly_artifact());
        let report = service.predict_planet(&earth()).unwrap();
        assert_eq!(report.prediction, 1);
        assert!(report.habitability_score >= 0.58);
        assert_eq!(report.insights.hsi, 1.0);
        assert_eq!(report.insights.sci, 1.0);
        assert_eq!(report.insights.orbit_stability, 1.0);
        assert_eq!(report.model_name, "habitability-logreg");
    }

    #[test]
    fn test_insights_are_rounded() {
        let (_dir, service) = service_with_artifact(&friendly_artifact());
        let report = service
            .predict_planet(&observation(json!({
                "pl_rade": 1.3, "pl_eqt": 310.0, "pl_orbper": 290.0
            })))
            .unwrap();
        for value in [
            report.insights.model_probability,
            report.insights.hsi,
            report.insights.sci,
            report.insights.orbit_stability,
            report.habitability_score,
        ] {
            assert_eq!(value, fusion::round4(value));
        }
    }

    #[test]
    fn test_missing_model_surfaces_model_error() {
        let dir = TempDir::new().unwrap();
        let oracle = ModelOracle::new(dir.path().join("absent.json"));
        let service = PredictionService::new(Arc::new(oracle));
        let err = service.predict_planet(&earth()).unwrap_err();
        assert!(matches!(err, PredictError::Model(ModelError::NotFound(_))));
    }

    #[test]
    fn test_insights_survive_schema_without_indices() {
        // A model trained without HSI/SCI still yields engineered insights.
        let doc = json!({
            "kind": "estimator",
            "name": "radius-only",
            "feature_names": ["pl_rade"],
            "model": {
                "family": "logistic_regression",
                "coefficients": [0.4],
                "intercept": -0.2
            }
        });
        let (_dir, service) = service_with_artifact(&doc);
        let report = service.predict_planet(&earth()).unwrap();
        assert_eq!(report.insights.hsi, 1.0);
        assert_eq!(report.insights.sci, 1.0);
    }

    #[test]
    fn test_hostile_observation_is_not_habitable() {
        let doc = json!({
            "kind": "estimator",
            "name": "pessimist",
            "feature_names": ["pl_rade"],
            "model": {
                "family": "logistic_regression",
                "coefficients": [0.0],
                "intercept": -30.0
            }
        });
        let (_dir, service) = service_with_artifact(&doc);
        let report = service
            .predict_planet(&observation(json!({
                "pl_rade": 19.0, "pl_eqt": 1900.0, "pl_orbper": 4900.0,
                "st_teff": 9500.0, "st_mass": 4.5, "st_rad": 9.0
            })))
            .unwrap();
        assert_eq!(report.prediction, 0);
        assert!(report.habitability_score < 0.58);
    }
}
