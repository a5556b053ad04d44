//! Model Artifact - On-Disk Classifier Format
//!
//! JSON contract for trained artifacts exported by the offline training
//! pipeline: either a bare estimator or a preprocessing pipeline whose final
//! step is an estimator. Parsed with serde and structurally validated before
//! anything is allowed to score with it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Structural problem found in an artifact at load time.
#[derive(Debug, Clone, Error)]
#[error("invalid model artifact: {0}")]
pub struct ArtifactError(pub String);

// ============================================================================
// ARTIFACT SHAPES
// ============================================================================

/// Top-level artifact document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// A bare trained estimator.
    Estimator(Estimator),
    /// Preprocessing steps followed by a terminal estimator.
    Pipeline {
        steps: Vec<PipelineStep>,
        /// Training schema; exporters may put it here instead of on the
        /// estimator.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
    },
}

/// One step of a preprocessing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PipelineStep {
    /// Replace missing values with per-column training medians.
    MedianImputer { statistics: Vec<f64> },
    /// Standardize columns using training-time moments.
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
    /// Terminal trained estimator.
    Estimator(Estimator),
}

/// A trained classifier plus its training-time metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimator {
    pub name: String,
    /// Ordered training schema, when exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Per-column importances, when the family has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
    pub model: ClassifierModel,
}

/// Supported classifier families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ClassifierModel {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Leaf values are class-1 probabilities, averaged across trees.
    RandomForest { trees: Vec<DecisionTree> },
    /// Leaf values are additive logits on top of the base score.
    GradientBoosting {
        base_score: f64,
        trees: Vec<DecisionTree>,
    },
}

/// Flat node-array decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// One tree node; `feature < 0` marks a leaf carrying `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature: i32,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub value: f64,
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Standard logistic function.
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl PipelineStep {
    /// Apply a preprocessing step in place. Estimator steps do not transform.
    pub fn apply(&self, values: &mut [f64]) {
        match self {
            PipelineStep::MedianImputer { statistics } => {
                for (i, value) in values.iter_mut().enumerate() {
                    if !value.is_finite() {
                        *value = statistics.get(i).copied().unwrap_or(0.0);
                    }
                }
            }
            PipelineStep::StandardScaler { mean, scale } => {
                for (i, value) in values.iter_mut().enumerate() {
                    let m = mean.get(i).copied().unwrap_or(0.0);
                    let s = scale.get(i).copied().unwrap_or(1.0);
                    *value = (*value - m) / s;
                }
            }
            PipelineStep::Estimator(_) => {}
        }
    }
}

impl DecisionTree {
    /// Walk from the root to a leaf and return its value.
    ///
    /// Child indices are checked at load time (forward-only edges), so the
    /// walk always terminates.
    pub fn decision(&self, features: &[f64]) -> f64 {
        let mut index = 0usize;
        while let Some(node) = self.nodes.get(index) {
            if node.feature < 0 {
                return node.value;
            }
            let observed = features.get(node.feature as usize).copied().unwrap_or(0.0);
            index = if observed <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
        0.0
    }
}

impl ClassifierModel {
    /// Class-1 probability for one feature vector in schema order.
    pub fn probability(&self, features: &[f64]) -> f64 {
        match self {
            ClassifierModel::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z: f64 = intercept
                    + coefficients
                        .iter()
                        .zip(features.iter())
                        .map(|(c, x)| c * x)
                        .sum::<f64>();
                sigmoid(z)
            }
            ClassifierModel::RandomForest { trees } => {
                if trees.is_empty() {
                    return 0.0;
                }
                let total: f64 = trees.iter().map(|t| t.decision(features)).sum();
                total / trees.len() as f64
            }
            ClassifierModel::GradientBoosting { base_score, trees } => {
                let logit: f64 =
                    base_score + trees.iter().map(|t| t.decision(features)).sum::<f64>();
                sigmoid(logit)
            }
        }
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ClassifierModel::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.is_empty() {
                    return Err(ArtifactError(
                        "logistic regression has no coefficients".to_string(),
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError(
                        "logistic regression parameters must be finite".to_string(),
                    ));
                }
                Ok(())
            }
            ClassifierModel::RandomForest { trees } => validate_trees(trees),
            ClassifierModel::GradientBoosting { base_score, trees } => {
                if !base_score.is_finite() {
                    return Err(ArtifactError("base score must be finite".to_string()));
                }
                validate_trees(trees)
            }
        }
    }
}

fn validate_trees(trees: &[DecisionTree]) -> Result<(), ArtifactError> {
    if trees.is_empty() {
        return Err(ArtifactError("tree ensemble has no trees".to_string()));
    }
    for tree in trees {
        if tree.nodes.is_empty() {
            return Err(ArtifactError("tree has no nodes".to_string()));
        }
        for (i, node) in tree.nodes.iter().enumerate() {
            if !node.threshold.is_finite() || !node.value.is_finite() {
                return Err(ArtifactError("tree parameters must be finite".to_string()));
            }
            if node.feature >= 0 {
                // Forward-only edges keep traversal acyclic and in bounds.
                let forward = node.left > i as i32
                    && node.right > i as i32
                    && (node.left as usize) < tree.nodes.len()
                    && (node.right as usize) < tree.nodes.len();
                if !forward {
                    return Err(ArtifactError(format!(
                        "tree node {} has invalid child indices",
                        i
                    )));
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// VALIDATION
// ============================================================================

impl Estimator {
    fn validate(&self) -> Result<(), ArtifactError> {
        self.model.validate()?;
        if let (Some(names), Some(importances)) =
            (&self.feature_names, &self.feature_importances)
        {
            if names.len() != importances.len() {
                return Err(ArtifactError(format!(
                    "{} importances for {} features",
                    importances.len(),
                    names.len()
                )));
            }
        }
        Ok(())
    }

    fn validate_arity(&self, columns: usize) -> Result<(), ArtifactError> {
        if let Some(importances) = &self.feature_importances {
            if importances.len() != columns {
                return Err(ArtifactError(format!(
                    "{} importances for {} columns",
                    importances.len(),
                    columns
                )));
            }
        }
        match &self.model {
            ClassifierModel::LogisticRegression { coefficients, .. } => {
                if coefficients.len() != columns {
                    return Err(ArtifactError(format!(
                        "{} coefficients for {} columns",
                        coefficients.len(),
                        columns
                    )));
                }
            }
            ClassifierModel::RandomForest { trees }
            | ClassifierModel::GradientBoosting { trees, .. } => {
                for tree in trees {
                    for node in &tree.nodes {
                        if node.feature >= columns as i32 {
                            return Err(ArtifactError(format!(
                                "tree references feature {} outside {} columns",
                                node.feature, columns
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl ModelArtifact {
    /// The estimator that ultimately produces probabilities.
    pub fn final_estimator(&self) -> Option<&Estimator> {
        match self {
            ModelArtifact::Estimator(estimator) => Some(estimator),
            ModelArtifact::Pipeline { steps, .. } => match steps.last() {
                Some(PipelineStep::Estimator(estimator)) => Some(estimator),
                _ => None,
            },
        }
    }

    /// Structural checks that do not depend on the resolved schema.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ModelArtifact::Estimator(estimator) => estimator.validate(),
            ModelArtifact::Pipeline { steps, .. } => {
                let (terminal, transforms) = match steps.split_last() {
                    Some((PipelineStep::Estimator(estimator), rest)) => (estimator, rest),
                    Some(_) => {
                        return Err(ArtifactError(
                            "pipeline must end with an estimator".to_string(),
                        ))
                    }
                    None => return Err(ArtifactError("pipeline has no steps".to_string())),
                };
                for step in transforms {
                    match step {
                        PipelineStep::MedianImputer { statistics } => {
                            if statistics.iter().any(|v| !v.is_finite()) {
                                return Err(ArtifactError(
                                    "imputer statistics must be finite".to_string(),
                                ));
                            }
                        }
                        PipelineStep::StandardScaler { mean, scale } => {
                            if mean.iter().any(|v| !v.is_finite()) {
                                return Err(ArtifactError(
                                    "scaler means must be finite".to_string(),
                                ));
                            }
                            if scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
                                return Err(ArtifactError(
                                    "scaler scales must be finite and non-zero".to_string(),
                                ));
                            }
                        }
                        PipelineStep::Estimator(_) => {
                            return Err(ArtifactError(
                                "estimator must be the final pipeline step".to_string(),
                            ))
                        }
                    }
                }
                terminal.validate()
            }
        }
    }

    /// Checks that depend on the resolved schema width.
    pub fn validate_arity(&self, columns: usize) -> Result<(), ArtifactError> {
        if let ModelArtifact::Pipeline { steps, .. } = self {
            for step in steps {
                match step {
                    PipelineStep::MedianImputer { statistics } => {
                        if statistics.len() != columns {
                            return Err(ArtifactError(format!(
                                "imputer carries {} columns, schema has {}",
                                statistics.len(),
                                columns
                            )));
                        }
                    }
                    PipelineStep::StandardScaler { mean, scale } => {
                        if mean.len() != columns || scale.len() != columns {
                            return Err(ArtifactError(format!(
                                "scaler carries {} columns, schema has {}",
                                mean.len(),
                                columns
                            )));
                        }
                    }
                    PipelineStep::Estimator(_) => {}
                }
            }
        }
        match self.final_estimator() {
            Some(estimator) => estimator.validate_arity(columns),
            None => Err(ArtifactError("pipeline has no estimator".to_string())),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn logreg(coefficients: Vec<f64>, intercept: f64) -> Estimator {
        Estimator {
            name: "logreg-test".to_string(),
            feature_names: None,
            feature_importances: None,
            model: ClassifierModel::LogisticRegression {
                coefficients,
                intercept,
            },
        }
    }

    fn leaf(value: f64) -> TreeNode {
        TreeNode {
            feature: -1,
            threshold: 0.0,
            left: 0,
            right: 0,
            value,
        }
    }

    fn split(feature: i32, threshold: f64, left: i32, right: i32) -> TreeNode {
        TreeNode {
            feature,
            threshold,
            left,
            right,
            value: 0.0,
        }
    }

    fn stump(value: f64) -> DecisionTree {
        DecisionTree {
            nodes: vec![leaf(value)],
        }
    }

    #[test]
    fn test_logistic_regression_probability() {
        let model = ClassifierModel::LogisticRegression {
            coefficients: vec![1.0, -0.5],
            intercept: 0.25,
        };
        // z = 0.25 + 2.0 - 1.0 = 1.25
        let p = model.probability(&[2.0, 2.0]);
        assert!((p - 0.7773).abs() < 1e-4);
    }

    #[test]
    fn test_zero_logit_is_half() {
        let model = ClassifierModel::LogisticRegression {
            coefficients: vec![0.0],
            intercept: 0.0,
        };
        assert_eq!(model.probability(&[123.0]), 0.5);
    }

    #[test]
    fn test_tree_traversal() {
        let tree = DecisionTree {
            nodes: vec![split(0, 5.0, 1, 2), leaf(0.2), leaf(0.9)],
        };
        assert_eq!(tree.decision(&[3.0]), 0.2);
        assert_eq!(tree.decision(&[7.0]), 0.9);
        // Splits send values equal to the threshold left.
        assert_eq!(tree.decision(&[5.0]), 0.2);
    }

    #[test]
    fn test_random_forest_averages_leaves() {
        let model = ClassifierModel::RandomForest {
            trees: vec![stump(0.4), stump(0.8)],
        };
        assert!((model.probability(&[]) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_boosting_applies_sigmoid() {
        let model = ClassifierModel::GradientBoosting {
            base_score: 0.1,
            trees: vec![stump(0.65), stump(0.5)],
        };
        // logit = 0.1 + 0.65 + 0.5 = 1.25
        let p = model.probability(&[]);
        assert!((p - 0.7773).abs() < 1e-4);
    }

    #[test]
    fn test_pipeline_steps_apply_in_order() {
        let imputer = PipelineStep::MedianImputer {
            statistics: vec![5.0, 0.0],
        };
        let scaler = PipelineStep::StandardScaler {
            mean: vec![5.0, 0.0],
            scale: vec![1.0, 2.0],
        };
        let mut values = vec![f64::NAN, 10.0];
        imputer.apply(&mut values);
        assert_eq!(values, vec![5.0, 10.0]);
        scaler.apply(&mut values);
        assert_eq!(values, vec![0.0, 5.0]);
    }

    #[test]
    fn test_validate_rejects_empty_coefficients() {
        let artifact = ModelArtifact::Estimator(logreg(vec![], 0.0));
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_parameters() {
        let artifact = ModelArtifact::Estimator(logreg(vec![1.0], f64::NAN));
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_backward_tree_edge() {
        let tree = DecisionTree {
            // Left child points back at the root.
            nodes: vec![split(0, 1.0, 0, 1), leaf(0.5)],
        };
        let artifact = ModelArtifact::Estimator(Estimator {
            name: "forest-test".to_string(),
            feature_names: None,
            feature_importances: None,
            model: ClassifierModel::RandomForest { trees: vec![tree] },
        });
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_validate_requires_terminal_estimator() {
        let no_estimator = ModelArtifact::Pipeline {
            steps: vec![PipelineStep::MedianImputer {
                statistics: vec![0.0],
            }],
            feature_names: None,
        };
        assert!(no_estimator.validate().is_err());

        let estimator_first = ModelArtifact::Pipeline {
            steps: vec![
                PipelineStep::Estimator(logreg(vec![1.0], 0.0)),
                PipelineStep::MedianImputer {
                    statistics: vec![0.0],
                },
            ],
            feature_names: None,
        };
        assert!(estimator_first.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let artifact = ModelArtifact::Pipeline {
            steps: vec![
                PipelineStep::StandardScaler {
                    mean: vec![0.0],
                    scale: vec![0.0],
                },
                PipelineStep::Estimator(logreg(vec![1.0], 0.0)),
            ],
            feature_names: None,
        };
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_validate_arity_checks_widths() {
        let artifact = ModelArtifact::Estimator(logreg(vec![1.0, 2.0], 0.0));
        assert!(artifact.validate_arity(2).is_ok());
        assert!(artifact.validate_arity(3).is_err());

        let pipeline = ModelArtifact::Pipeline {
            steps: vec![
                PipelineStep::MedianImputer {
                    statistics: vec![0.0],
                },
                PipelineStep::Estimator(logreg(vec![1.0, 2.0], 0.0)),
            ],
            feature_names: None,
        };
        assert!(pipeline.validate_arity(2).is_err());
    }

    #[test]
    fn test_artifact_deserializes_from_json() {
        let doc = r#"{
            "kind": "pipeline",
            "feature_names": ["pl_rade", "pl_eqt"],
            "steps": [
                {"step": "median_imputer", "statistics": [1.2, 255.0]},
                {"step": "standard_scaler", "mean": [1.5, 400.0], "scale": [0.9, 310.0]},
                {"step": "estimator", "name": "habitability-logreg",
                 "model": {"family": "logistic_regression",
                           "coefficients": [0.8, -0.3], "intercept": -0.1}}
            ]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(doc).unwrap();
        assert!(artifact.validate().is_ok());
        assert!(artifact.validate_arity(2).is_ok());
        let estimator = artifact.final_estimator().unwrap();
        assert_eq!(estimator.name, "habitability-logreg");

        let bare = r#"{
            "kind": "estimator",
            "name": "forest",
            "feature_names": ["pl_rade"],
            "feature_importances": [1.0],
            "model": {"family": "random_forest",
                      "trees": [{"nodes": [{"feature": -1, "value": 0.7}]}]}
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(bare).unwrap();
        assert!(artifact.validate().is_ok());
        assert!(artifact.validate_arity(1).is_ok());
    }
}
