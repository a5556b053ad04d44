//! Prediction handler & input validation

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::logic::features::{observation::parse_numeric, Observation};
use crate::logic::service::ScoreInsights;
use crate::{AppError, AppResult, AppState};

/// Validated scientific ranges for the known numeric fields.
pub const VALIDATION_RULES: &[(&str, f64, f64)] = &[
    ("pl_rade", 0.1, 20.0),
    ("pl_eqt", 50.0, 2000.0),
    ("pl_orbper", 0.0, 5000.0),
    ("st_teff", 2000.0, 10000.0),
    ("st_mass", 0.1, 5.0),
    ("st_rad", 0.1, 10.0),
];

#[derive(Serialize)]
pub struct PredictResponse {
    status: &'static str,
    prediction: u8,
    habitability_score: f64,
    insights: ScoreInsights,
    model: String,
}

/// Collect range and type violations for the known fields present in the
/// observation. Absent fields are not violations.
pub fn validate_inputs(observation: &Observation) -> Vec<String> {
    let mut errors = Vec::new();
    for (field, min, max) in VALIDATION_RULES {
        let raw = match observation.raw(field) {
            Some(raw) => raw,
            None => continue,
        };
        match parse_numeric(raw) {
            Some(value) => {
                if value < *min || value > *max {
                    errors.push(format!(
                        "{} outside scientific range [{},{}]",
                        field, min, max
                    ));
                }
            }
            None => errors.push(format!("{} must be numeric", field)),
        }
    }
    errors
}

/// Score one observation
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<PredictResponse>> {
    let observation = match payload {
        Value::Object(map) => Observation::from(map),
        Value::Null => return Err(AppError::EmptyInput),
        _ => {
            return Err(AppError::InvalidInput(vec![
                "request body must be a JSON object".to_string(),
            ]))
        }
    };

    if observation.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let errors = validate_inputs(&observation);
    if !errors.is_empty() {
        return Err(AppError::InvalidInput(errors));
    }

    let report = state.prediction.predict_planet(&observation)?;

    Ok(Json(PredictResponse {
        status: "success",
        prediction: report.prediction,
        habitability_score: report.habitability_score,
        insights: report.insights,
        model: report.model_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observation(value: Value) -> Observation {
        match value {
            Value::Object(map) => Observation::from(map),
            _ => panic!("observation fixtures must be JSON objects"),
        }
    }

    #[test]
    fn test_in_range_values_pass() {
        let errors = validate_inputs(&observation(json!({
            "pl_rade": 1.0, "pl_eqt": 288, "st_teff": "5778"
        })));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_out_of_range_is_reported_verbatim() {
        let errors = validate_inputs(&observation(json!({ "pl_rade": 100 })));
        assert_eq!(errors, vec!["pl_rade outside scientific range [0.1,20]"]);

        let errors = validate_inputs(&observation(json!({ "pl_eqt": 10 })));
        assert_eq!(errors, vec!["pl_eqt outside scientific range [50,2000]"]);
    }

    #[test]
    fn test_non_numeric_is_reported() {
        let errors = validate_inputs(&observation(json!({ "st_teff": "hot" })));
        assert_eq!(errors, vec!["st_teff must be numeric"]);
    }

    #[test]
    fn test_absent_fields_are_not_violations() {
        let errors = validate_inputs(&observation(json!({ "pl_bmasse": 1e9 })));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_multiple_violations_accumulate() {
        let errors = validate_inputs(&observation(json!({
            "pl_rade": 0.01, "st_mass": "heavy"
        })));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_nan_string_passes_range_check() {
        // Float coercion admits NaN, and NaN compares false to both bounds.
        let errors = validate_inputs(&observation(json!({ "pl_rade": "NaN" })));
        assert!(errors.is_empty());
    }
}
