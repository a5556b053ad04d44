//! Schema Alignment - Feature Rows vs Trained Schemas
//!
//! A trained model expects an exact ordered column list; serving-time rows
//! carry whatever the transform produced. Alignment projects a row onto the
//! model schema: missing columns become zero, extras are dropped, column
//! order is fixed.

use thiserror::Error;

use super::artifact::ModelArtifact;
use crate::logic::features::FeatureRow;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Schema recovery failure. Raised once at load time, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("model artifact does not expose feature names")]
    Unrecoverable,
}

// ============================================================================
// SCHEMA RECOVERY
// ============================================================================

/// Resolve the ordered column list a trained artifact expects.
///
/// Pipelines may carry the schema at the top level or on the terminal
/// estimator; both are honored, top level first.
pub fn expected_columns(artifact: &ModelArtifact) -> Result<Vec<String>, SchemaError> {
    let names = match artifact {
        ModelArtifact::Estimator(estimator) => estimator.feature_names.clone(),
        ModelArtifact::Pipeline { feature_names, .. } => feature_names.clone().or_else(|| {
            artifact
                .final_estimator()
                .and_then(|estimator| estimator.feature_names.clone())
        }),
    };
    names.ok_or(SchemaError::Unrecoverable)
}

// ============================================================================
// ALIGNMENT
// ============================================================================

/// A feature row projected onto a model schema, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub values: Vec<f64>,
}

/// Project a row onto `expected`: zero-fill missing columns, drop extras,
/// fix ordering. Pure; the input row is untouched.
pub fn align(row: &FeatureRow, expected: &[String]) -> AlignedRow {
    let values = expected
        .iter()
        .map(|column| row.get(column).copied().unwrap_or(0.0))
        .collect();
    AlignedRow { values }
}

// ============================================================================
// TESTS
// ============================================================================
