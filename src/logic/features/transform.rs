//! Feature Transform - Observation to Model-Ready Row
//!
//! Pure, deterministic mapping from a raw observation to a cleaned,
//! schema-complete feature row. Applied identically at training time and
//! at request time; any drift here silently corrupts every prediction.

use std::collections::BTreeMap;

use super::indices::{habitability_index, stellar_index};
use super::observation::{parse_numeric, Observation};

// ============================================================================
// DERIVED FEATURE DEFINITIONS
// ============================================================================

/// Skewed astronomy values that get a `log_<name>` companion feature
pub const LOG_FEATURES: &[&str] = &["pl_orbper", "pl_bmasse", "pl_rade"];

/// Flags the trained model expects; default to 0 when not observed
pub const DEFAULT_FLAGS: &[&str] = &["ast_flag", "cb_flag", "dec"];

/// A derived feature row, keyed by feature name. Ordered map so that
/// serialization of the same observation is byte-stable.
pub type FeatureRow = BTreeMap<String, f64>;

// ============================================================================
// TRANSFORM
// ============================================================================

/// Derive the full feature row for one observation.
///
/// Every present field is coerced to a finite number, with 0 standing in
/// for anything unusable (the serving-time fill policy; training used
/// median fill inside the fitted pipeline). The engineered indices, log
/// and ratio features, and default flags are then layered on top.
///
/// Never fails: an incomplete observation yields a complete row.
pub fn transform(observation: &Observation) -> FeatureRow {
    let mut row = FeatureRow::new();

    // Clean: coerce present fields, zero-fill the unusable ones
    for (name, value) in observation.fields() {
        let numeric = parse_numeric(value).filter(|v| v.is_finite()).unwrap_or(0.0);
        row.insert(name.clone(), numeric);
    }

    // Engineered indices. Fields absent from the observation contribute a
    // zero sub-score; fields present but zero-filled score their proximity.
    let hsi = habitability_index(row.get("pl_rade").copied(), row.get("pl_eqt").copied());
    let sci = stellar_index(
        row.get("st_teff").copied(),
        row.get("st_mass").copied(),
        row.get("st_rad").copied(),
    );
    row.insert("HSI".to_string(), hsi);
    row.insert("SCI".to_string(), sci);

    // Log features for skewed magnitudes, only where the source exists
    for &col in LOG_FEATURES {
        if let Some(&value) = row.get(col) {
            row.insert(format!("log_{col}"), value.max(0.0).ln_1p());
        }
    }

    // Physics-inspired ratios, only where both inputs exist
    if let (Some(&pl_rade), Some(&st_rad)) = (row.get("pl_rade"), row.get("st_rad")) {
        row.insert(
            "planet_star_radius_ratio".to_string(),
            pl_rade / (st_rad + 1e-6),
        );
    }
    if let (Some(&st_mass), Some(&st_rad)) = (row.get("st_mass"), row.get("st_rad")) {
        row.insert("stellar_density_proxy".to_string(), st_mass / (st_rad + 1e-6));
    }

    // Training defaults the model expects
    for &flag in DEFAULT_FLAGS {
        row.entry(flag.to_string()).or_insert(0.0);
    }

    row
}

// ============================================================================
// TESTS
// ============================================================================
