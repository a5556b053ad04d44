//! Physical Indices - HSI, SCI & Orbital Stability
//!
//! Hand-designed [0,1] scores measuring how Earth-like a planet and how
//! Sun-like its host star are. Ideals and scales are fixed design
//! constants, matched to the values the classifier was trained against.

// ============================================================================
// IDEALS & SCALES (Constants - fixed at training time)
// ============================================================================

/// Ideal planet radius (Earth radii)
pub const RADIUS_IDEAL: f64 = 1.0;
pub const RADIUS_SCALE: f64 = 1.5;

/// Ideal equilibrium temperature (Kelvin)
pub const TEMP_IDEAL: f64 = 288.0;
pub const TEMP_SCALE: f64 = 200.0;

/// Ideal host-star effective temperature (Kelvin, Sun = 5778)
pub const TEFF_IDEAL: f64 = 5778.0;
pub const TEFF_SCALE: f64 = 2500.0;

/// Ideal host-star mass (solar masses)
pub const STELLAR_MASS_IDEAL: f64 = 1.0;
pub const STELLAR_MASS_SCALE: f64 = 1.0;

/// Ideal host-star radius (solar radii)
pub const STELLAR_RADIUS_IDEAL: f64 = 1.0;
pub const STELLAR_RADIUS_SCALE: f64 = 1.0;

/// Ideal orbital period (days, Earth = 365)
pub const ORBIT_IDEAL_DAYS: f64 = 365.0;
pub const ORBIT_SCALE_DAYS: f64 = 600.0;

/// Stability score when the orbital period is unknown
pub const NEUTRAL_ORBIT_SCORE: f64 = 0.5;

// ============================================================================
// PROXIMITY SCORING
// ============================================================================

/// Score in [0,1] based on distance from an ideal value:
/// `1 - |value - ideal| / scale`, clamped.
pub fn proximity_score(value: f64, ideal: f64, scale: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (1.0 - (value - ideal).abs() / scale).clamp(0.0, 1.0)
}

/// Sub-score for one index input. A missing input contributes 0 to the
/// index mean rather than being excluded, so a fully-missing observation
/// scores 0, not an average over nothing.
fn sub_score(value: Option<f64>, ideal: f64, scale: f64) -> f64 {
    value.map(|v| proximity_score(v, ideal, scale)).unwrap_or(0.0)
}

// ============================================================================
// HABITABILITY SCORE INDEX (HSI)
// ============================================================================

/// Mean proximity of planet radius and equilibrium temperature to
/// Earth-like ideals.
pub fn habitability_index(radius: Option<f64>, temperature: Option<f64>) -> f64 {
    let radius_score = sub_score(radius, RADIUS_IDEAL, RADIUS_SCALE);
    let temp_score = sub_score(temperature, TEMP_IDEAL, TEMP_SCALE);

    (radius_score + temp_score) / 2.0
}

// ============================================================================
// STELLAR COMPATIBILITY INDEX (SCI)
// ============================================================================

/// Mean proximity of host-star temperature, mass and radius to Sun-like
/// ideals.
pub fn stellar_index(teff: Option<f64>, mass: Option<f64>, radius: Option<f64>) -> f64 {
    let teff_score = sub_score(teff, TEFF_IDEAL, TEFF_SCALE);
    let mass_score = sub_score(mass, STELLAR_MASS_IDEAL, STELLAR_MASS_SCALE);
    let radius_score = sub_score(radius, STELLAR_RADIUS_IDEAL, STELLAR_RADIUS_SCALE);

    (teff_score + mass_score + radius_score) / 3.0
}

// ============================================================================
// ORBITAL STABILITY
// ============================================================================

/// Heuristic stability score from the orbital period's proximity to the
/// Earth year. An unknown or zero period is neutral, not hostile.
pub fn orbital_stability(period: Option<f64>) -> f64 {
    match period {
        Some(p) if p != 0.0 && p.is_finite() => {
            proximity_score(p, ORBIT_IDEAL_DAYS, ORBIT_SCALE_DAYS)
        }
        _ => NEUTRAL_ORBIT_SCORE,
    }
}

// ============================================================================
// TESTS
// ============================================================================
