//! Score Fusion Engine - Blending Model & Physics
//!
//! Combines the classifier probability with the engineered physical indices
//! into one calibrated habitability score, then applies the decision
//! threshold.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Weight on the classifier probability.
pub const MODEL_WEIGHT: f64 = 0.35;

/// Weight on the habitability similarity index.
pub const HSI_WEIGHT: f64 = 0.30;

/// Weight on the stellar compatibility index.
pub const SCI_WEIGHT: f64 = 0.20;

/// Weight on the orbital stability heuristic.
pub const ORBIT_WEIGHT: f64 = 0.15;

/// Exponent lifting mid-range blended scores.
pub const BOOST_EXPONENT: f64 = 0.85;

/// Final scores at or above this are habitable.
pub const DECISION_THRESHOLD: f64 = 0.58;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Blend weights for the fused score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionWeights {
    pub model_probability: f64,
    pub hsi: f64,
    pub sci: f64,
    pub orbit_stability: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            model_probability: MODEL_WEIGHT,
            hsi: HSI_WEIGHT,
            sci: SCI_WEIGHT,
            orbit_stability: ORBIT_WEIGHT,
        }
    }
}

// ============================================================================
// FUSION
// ============================================================================

/// Clamp to [0,1]; non-finite values clamp to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Round to 4 decimal places, the precision of outbound scores.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Blend with the default weights into a final score in [0,1].
pub fn fuse(model_probability: f64, hsi: f64, sci: f64, orbit_stability: f64) -> f64 {
    fuse_with_weights(
        &FusionWeights::default(),
        model_probability,
        hsi,
        sci,
        orbit_stability,
    )
}

/// Weighted blend, non-linear boost, 4-decimal rounding.
pub fn fuse_with_weights(
    weights: &FusionWeights,
    model_probability: f64,
    hsi: f64,
    sci: f64,
    orbit_stability: f64,
) -> f64 {
    let base = weights.model_probability * clamp_unit(model_probability)
        + weights.hsi * clamp_unit(hsi)
        + weights.sci * clamp_unit(sci)
        + weights.orbit_stability * clamp_unit(orbit_stability);
    round4(base.powf(BOOST_EXPONENT))
}

/// Binary habitability decision on a fused score.
pub fn decide(score: f64) -> u8 {
    u8::from(score >= DECISION_THRESHOLD)
}

// ============================================================================
// TESTS
// ============================================================================
