//! Dataset Statistics - Bands, Means, Health
//!
//! Summary analytics over the ranked dataset for the dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use super::reader::{numeric_value, RankedDataset, SCORE_COLUMN};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Columns surfaced as per-feature means when present.
pub const FEATURE_MEAN_COLUMNS: &[&str] = &["pl_rade", "pl_eqt", "st_teff", "st_mass", "st_rad"];

// ============================================================================
// SCORE BANDS
// ============================================================================

/// Histogram band for a habitability score. Bands are left-closed; the top
/// band also includes 1.0. Out-of-range and non-finite scores have no band.
pub fn score_band(score: f64) -> Option<&'static str> {
    if !score.is_finite() {
        return None;
    }
    if (0.0..0.25).contains(&score) {
        Some("Very Low")
    } else if (0.25..0.5).contains(&score) {
        Some("Low")
    } else if (0.5..0.75).contains(&score) {
        Some("Medium")
    } else if (0.75..=1.0).contains(&score) {
        Some("High")
    } else {
        None
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Score histogram over the four fixed bands.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreDistribution {
    #[serde(rename = "Very Low")]
    pub very_low: usize,
    #[serde(rename = "Low")]
    pub low: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "High")]
    pub high: usize,
}

impl ScoreDistribution {
    /// Count a score into its band; bandless scores are not counted.
    fn add(&mut self, score: f64) {
        let slot = match score_band(score) {
            Some("Very Low") => &mut self.very_low,
            Some("Low") => &mut self.low,
            Some("Medium") => &mut self.medium,
            Some("High") => &mut self.high,
            _ => return,
        };
        *slot += 1;
    }
}

/// Whole-dataset analytics for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_planets: usize,
    pub habitable_count: usize,
    pub avg_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub distribution: ScoreDistribution,
    pub feature_means: BTreeMap<String, Option<f64>>,
}

// ============================================================================
// COMPUTATION
// ============================================================================

/// Derive dataset analytics from the loaded rows.
pub fn compute_stats(dataset: &RankedDataset) -> DatasetStats {
    let mut distribution = ScoreDistribution::default();
    for row in &dataset.rows {
        if let Some(score) = numeric_value(row, SCORE_COLUMN) {
            distribution.add(score);
        }
    }

    let feature_means = FEATURE_MEAN_COLUMNS
        .iter()
        .filter(|column| dataset.has_column(column))
        .map(|column| (column.to_string(), dataset.column_mean(column)))
        .collect();

    DatasetStats {
        total_planets: dataset.rows.len(),
        habitable_count: dataset.habitable_count().unwrap_or(0),
        avg_score: dataset.column_mean(SCORE_COLUMN),
        min_score: dataset.column_min(SCORE_COLUMN),
        max_score: dataset.column_max(SCORE_COLUMN),
        distribution,
        feature_means,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dataset(contents: &str) -> RankedDataset {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ranked.csv");
        std::fs::write(&path, contents).unwrap();
        RankedDataset::load(path).unwrap()
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(score_band(0.0), Some("Very Low"));
        assert_eq!(score_band(0.2499), Some("Very Low"));
        assert_eq!(score_band(0.25), Some("Low"));
        assert_eq!(score_band(0.5), Some("Medium"));
        assert_eq!(score_band(0.75), Some("High"));
        assert_eq!(score_band(1.0), Some("High"));
        assert_eq!(score_band(1.01), None);
        assert_eq!(score_band(-0.1), None);
        assert_eq!(score_band(f64::NAN), None);
    }

    #[test]
    fn test_distribution_counts() {
        let data = dataset(
            "pl_name,habitability_score,prediction\n\
             a,0.1,0\nb,0.3,0\nc,0.6,1\nd,0.8,1\ne,0.95,1\nf,,0\n",
        );
        let stats = compute_stats(&data);
        assert_eq!(stats.total_planets, 6);
        assert_eq!(stats.habitable_count, 3);
        assert_eq!(stats.distribution.very_low, 1);
        assert_eq!(stats.distribution.low, 1);
        assert_eq!(stats.distribution.medium, 1);
        assert_eq!(stats.distribution.high, 2);
    }

    #[test]
    fn test_all_nan_scores_yield_null_aggregates() {
        let data = dataset("pl_name,habitability_score\na,NaN\nb,NaN\n");
        let stats = compute_stats(&data);
        assert_eq!(stats.avg_score, None);
        assert_eq!(stats.min_score, None);
        assert_eq!(stats.max_score, None);
        assert_eq!(stats.distribution.very_low, 0);
    }

    #[test]
    fn test_min_max_scores() {
        let data = dataset("pl_name,habitability_score\na,0.3\nb,0.9\nc,0.6\n");
        let stats = compute_stats(&data);
        assert_eq!(stats.min_score, Some(0.3));
        assert_eq!(stats.max_score, Some(0.9));
        assert!((stats.avg_score.unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_feature_means_follow_whitelist() {
        let data = dataset(
            "pl_name,habitability_score,pl_rade,st_mass,secret\n\
             a,0.5,1.0,0.8,42\nb,0.7,3.0,1.2,42\n",
        );
        let stats = compute_stats(&data);
        assert_eq!(stats.feature_means.get("pl_rade"), Some(&Some(2.0)));
        assert_eq!(stats.feature_means.get("st_mass"), Some(&Some(1.0)));
        assert!(!stats.feature_means.contains_key("secret"));
        assert!(!stats.feature_means.contains_key("pl_eqt"));
    }

    #[test]
    fn test_non_numeric_feature_column_has_null_mean() {
        let data = dataset("pl_name,habitability_score,pl_rade\na,0.5,unknown\n");
        let stats = compute_stats(&data);
        assert_eq!(stats.feature_means.get("pl_rade"), Some(&None));
    }
}
