//! Observation - Raw Planetary Input
//!
//! A single observation as submitted to the API: a JSON object mapping
//! parameter names to values. Fields are an arbitrary subset of the known
//! vocabulary; unknown extras are tolerated and carried through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// NUMERIC COERCION
// ============================================================================

/// Coerce a raw JSON value to a number, the same way the training data
/// ingestion did: numbers pass through, numeric strings parse, booleans
/// map to 0/1. Anything else is not a number.
///
/// Non-finite results (an "inf"/"nan" string parses) are returned as-is;
/// callers that need a usable value filter them out.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// ============================================================================
// OBSERVATION
// ============================================================================

/// One raw observation, keyed by parameter name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(serde_json::Map<String, Value>);

impl Observation {
    /// True when no fields were provided at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw JSON value of a field, if present.
    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Usable numeric value of a field: coerced, finite. Missing fields,
    /// non-numeric values, and non-finite values are all `None`.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.raw(field)
            .and_then(parse_numeric)
            .filter(|v| v.is_finite())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<serde_json::Map<String, Value>> for Observation {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obs(value: Value) -> Observation {
        match value {
            Value::Object(map) => Observation::from(map),
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_numeric_from_json_number() {
        let o = obs(json!({ "pl_rade": 1.34 }));
        assert_eq!(o.numeric("pl_rade"), Some(1.34));
    }

    #[test]
    fn test_numeric_from_string() {
        let o = obs(json!({ "pl_eqt": "288", "st_teff": " 5778.0 ", "pl_orbper": "1e2" }));
        assert_eq!(o.numeric("pl_eqt"), Some(288.0));
        assert_eq!(o.numeric("st_teff"), Some(5778.0));
        assert_eq!(o.numeric("pl_orbper"), Some(100.0));
    }

    #[test]
    fn test_bool_coerces_to_binary() {
        let o = obs(json!({ "cb_flag": true, "ast_flag": false }));
        assert_eq!(o.numeric("cb_flag"), Some(1.0));
        assert_eq!(o.numeric("ast_flag"), Some(0.0));
    }

    #[test]
    fn test_non_numeric_values_are_missing() {
        let o = obs(json!({
            "pl_name": "Kepler-442 b",
            "extras": [1, 2],
            "nested": { "a": 1 },
            "empty": null
        }));
        assert_eq!(o.numeric("pl_name"), None);
        assert_eq!(o.numeric("extras"), None);
        assert_eq!(o.numeric("nested"), None);
        assert_eq!(o.numeric("empty"), None);
        assert_eq!(o.numeric("absent"), None);
    }

    #[test]
    fn test_non_finite_values_are_missing() {
        let o = obs(json!({ "a": "inf", "b": "-inf", "c": "nan" }));
        assert_eq!(o.numeric("a"), None);
        assert_eq!(o.numeric("b"), None);
        assert_eq!(o.numeric("c"), None);

        // the raw coercion still sees them as numbers
        assert_eq!(parse_numeric(&json!("inf")), Some(f64::INFINITY));
        assert!(parse_numeric(&json!("nan")).map_or(false, f64::is_nan));
    }

    #[test]
    fn test_is_empty() {
        assert!(obs(json!({})).is_empty());
        assert!(!obs(json!({ "pl_rade": 1.0 })).is_empty());
    }
}
