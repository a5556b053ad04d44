//! Model Oracle - Artifact Loading & Cached Inference
//!
//! Owns the trained classifier for the process lifetime. Loads lazily on
//! first use, caches success and failure alike, and swaps snapshots on
//! explicit reload. Callers hold an immutable `Arc<LoadedModel>`, so
//! in-flight predictions never observe a partial swap.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use super::artifact::{ClassifierModel, ModelArtifact, PipelineStep};
use super::schema::{self, AlignedRow, SchemaError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Why a model is not available for scoring.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Model not found at: {0}")]
    NotFound(String),
    #[error("Failed to load model: {0}")]
    LoadFailed(String),
    #[error("Model schema error: {0}")]
    Schema(#[from] SchemaError),
}

// ============================================================================
// STATE
// ============================================================================

enum ModelState {
    Unloaded,
    Loaded(Arc<LoadedModel>),
    Failed(ModelError),
}

// ============================================================================
// LOADED MODEL
// ============================================================================

/// Immutable snapshot of a trained model, resolved once at load time.
///
/// Pipeline polymorphism is flattened here: preprocessing steps and the
/// terminal classifier sit side by side, so the per-request path never
/// re-inspects the artifact shape.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub feature_schema: Vec<String>,
    pub feature_importances: Option<Vec<f64>>,
    transforms: Vec<PipelineStep>,
    classifier: ClassifierModel,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    fn resolve(artifact: ModelArtifact, feature_schema: Vec<String>) -> Result<Self, ModelError> {
        let (name, feature_importances, transforms, classifier) = match artifact {
            ModelArtifact::Estimator(estimator) => (
                estimator.name,
                estimator.feature_importances,
                Vec::new(),
                estimator.model,
            ),
            ModelArtifact::Pipeline { mut steps, .. } => {
                let estimator = match steps.pop() {
                    Some(PipelineStep::Estimator(estimator)) => estimator,
                    _ => {
                        return Err(ModelError::LoadFailed(
                            "pipeline has no terminal estimator".to_string(),
                        ))
                    }
                };
                (
                    estimator.name,
                    estimator.feature_importances,
                    steps,
                    estimator.model,
                )
            }
        };
        Ok(LoadedModel {
            name,
            feature_schema,
            feature_importances,
            transforms,
            classifier,
            loaded_at: Utc::now(),
        })
    }

    /// Class-1 probability for one aligned row.
    pub fn predict_probability(&self, row: &AlignedRow) -> f64 {
        self.probability_of(&row.values)
    }

    /// Binary decision for one aligned row (0.5 cut on the raw probability).
    pub fn predict(&self, row: &AlignedRow) -> u8 {
        u8::from(self.predict_probability(row) >= 0.5)
    }

    /// Class-1 probabilities for a batch, one matrix row per observation in
    /// schema order.
    pub fn predict_probability_batch(&self, rows: &Array2<f64>) -> Vec<f64> {
        rows.rows()
            .into_iter()
            .map(|row| self.probability_of(&row.to_vec()))
            .collect()
    }

    /// Binary decisions for a batch.
    pub fn predict_batch(&self, rows: &Array2<f64>) -> Vec<u8> {
        self.predict_probability_batch(rows)
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect()
    }

    fn probability_of(&self, values: &[f64]) -> f64 {
        let mut features = values.to_vec();
        for step in &self.transforms {
            step.apply(&mut features);
        }
        self.classifier.probability(&features)
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Oracle state snapshot for the engine-status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OracleStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub feature_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

// ============================================================================
// MODEL ORACLE
// ============================================================================

/// Lazy-loading holder for the trained artifact.
pub struct ModelOracle {
    path: PathBuf,
    state: RwLock<ModelState>,
}

impl ModelOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(ModelState::Unloaded),
        }
    }

    /// Current snapshot, loading from disk on first use.
    ///
    /// Success and failure are both cached; a recorded failure fails fast
    /// until `reload`.
    pub fn model(&self) -> Result<Arc<LoadedModel>, ModelError> {
        {
            let state = self.state.read();
            match &*state {
                ModelState::Loaded(model) => return Ok(model.clone()),
                ModelState::Failed(error) => return Err(error.clone()),
                ModelState::Unloaded => {}
            }
        }

        let mut state = self.state.write();
        // Another caller may have finished loading while we waited.
        match &*state {
            ModelState::Loaded(model) => return Ok(model.clone()),
            ModelState::Failed(error) => return Err(error.clone()),
            ModelState::Unloaded => {}
        }
        match load_from_disk(&self.path) {
            Ok(model) => {
                let model = Arc::new(model);
                tracing::info!(
                    "Model loaded: {} ({} columns)",
                    model.name,
                    model.feature_schema.len()
                );
                *state = ModelState::Loaded(model.clone());
                Ok(model)
            }
            Err(error) => {
                tracing::error!("Model load failed: {}", error);
                *state = ModelState::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Load fresh from disk and swap the cached snapshot.
    ///
    /// On failure an existing healthy snapshot is kept; without one the
    /// failure is recorded so later calls fail fast.
    pub fn reload(&self) -> Result<Arc<LoadedModel>, ModelError> {
        let mut state = self.state.write();
        match load_from_disk(&self.path) {
            Ok(model) => {
                let model = Arc::new(model);
                tracing::info!(
                    "Model reloaded: {} ({} columns)",
                    model.name,
                    model.feature_schema.len()
                );
                *state = ModelState::Loaded(model.clone());
                Ok(model)
            }
            Err(error) => {
                tracing::error!("Model reload failed: {}", error);
                if !matches!(&*state, ModelState::Loaded(_)) {
                    *state = ModelState::Failed(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Check if a healthy snapshot is cached.
    pub fn is_loaded(&self) -> bool {
        matches!(&*self.state.read(), ModelState::Loaded(_))
    }

    /// State snapshot for the engine-status endpoint.
    pub fn status(&self) -> OracleStatus {
        match &*self.state.read() {
            ModelState::Loaded(model) => OracleStatus {
                model_loaded: true,
                model_name: model.name.clone(),
                feature_count: model.feature_schema.len(),
                loaded_at: Some(model.loaded_at),
                last_error: None,
            },
            ModelState::Failed(error) => OracleStatus {
                model_loaded: false,
                model_name: "None".to_string(),
                feature_count: 0,
                loaded_at: None,
                last_error: Some(error.to_string()),
            },
            ModelState::Unloaded => OracleStatus {
                model_loaded: false,
                model_name: "None".to_string(),
                feature_count: 0,
                loaded_at: None,
                last_error: None,
            },
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn load_from_disk(path: &Path) -> Result<LoadedModel, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.display().to_string()));
    }
    let raw = fs::read(path).map_err(|e| ModelError::LoadFailed(e.to_string()))?;
    let artifact: ModelArtifact =
        serde_json::from_slice(&raw).map_err(|e| ModelError::LoadFailed(e.to_string()))?;
    artifact
        .validate()
        .map_err(|e| ModelError::LoadFailed(e.to_string()))?;
    let feature_schema = schema::expected_columns(&artifact)?;
    artifact
        .validate_arity(feature_schema.len())
        .map_err(|e| ModelError::LoadFailed(e.to_string()))?;
    LoadedModel::resolve(artifact, feature_schema)
}

// ============================================================================
// TESTS
// ============================================================================
