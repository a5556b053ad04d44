//! Ranked Dataset Reader - CSV Ingestion & Ordering
//!
//! Reads the precomputed ranked-exoplanet CSV produced by the offline
//! pipeline and serves sorted, limited views plus whole-dataset metadata.
//! Loaded per call, so offline rewrites show up without coordination.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Why the ranked dataset could not be served.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Ranked dataset not found at: {0}")]
    DatasetNotFound(String),
    #[error("Ranked dataset is empty")]
    DatasetEmpty,
    #[error("Ranked dataset unreadable: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score column written by the offline ranking pipeline.
pub const SCORE_COLUMN: &str = "habitability_score";

/// Binary decision column written by the offline ranking pipeline.
pub const PREDICTION_COLUMN: &str = "prediction";

/// Rows returned when the request does not say.
pub const DEFAULT_LIMIT: i64 = 20;

/// Smallest honored page size.
pub const MIN_LIMIT: i64 = 1;

/// Largest honored page size.
pub const MAX_LIMIT: i64 = 200;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One planet row, column name to typed JSON value.
pub type PlanetRecord = Map<String, Value>;

/// Sort direction for ranked views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Query parameters for a ranked view.
#[derive(Debug, Clone)]
pub struct RankRequest {
    pub limit: i64,
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for RankRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            sort_by: SCORE_COLUMN.to_string(),
            order: SortOrder::Descending,
        }
    }
}

/// A sorted, limited view of the dataset plus whole-dataset metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub total: usize,
    pub returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habitable_count: Option<usize>,
    pub planets: Vec<PlanetRecord>,
}

/// In-memory ranked dataset.
#[derive(Debug, Clone)]
pub struct RankedDataset {
    pub headers: Vec<String>,
    pub rows: Vec<PlanetRecord>,
}

// ============================================================================
// CELL PARSING
// ============================================================================

/// Type a raw CSV cell: integers, then floats, then text. Empty cells and
/// non-finite floats become null.
fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return Number::from_f64(float).map_or(Value::Null, Value::Number);
    }
    Value::String(trimmed.to_string())
}

/// Finite numeric cell value, if any.
pub fn numeric_value(row: &PlanetRecord, column: &str) -> Option<f64> {
    row.get(column)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

// ============================================================================
// DATASET
// ============================================================================

impl RankedDataset {
    /// Read the whole dataset from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RankingError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RankingError::DatasetNotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = PlanetRecord::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                row.insert(header.clone(), parse_cell(cell));
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(RankingError::DatasetEmpty);
        }

        Ok(Self { headers, rows })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Mean over finite values; None when the column has none.
    pub fn column_mean(&self, column: &str) -> Option<f64> {
        let values: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| numeric_value(row, column))
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn column_min(&self, column: &str) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|row| numeric_value(row, column))
            .reduce(f64::min)
    }

    pub fn column_max(&self, column: &str) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|row| numeric_value(row, column))
            .reduce(f64::max)
    }

    /// Rows flagged habitable; None when the prediction column is absent.
    pub fn habitable_count(&self) -> Option<usize> {
        if !self.has_column(PREDICTION_COLUMN) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter(|row| numeric_value(row, PREDICTION_COLUMN) == Some(1.0))
                .count(),
        )
    }

    /// Sort, limit, and package the dataset for the rank endpoint.
    ///
    /// An unknown sort column leaves file order untouched. Rows without a
    /// finite sort key go last in either direction, and the sort is stable.
    pub fn rank(mut self, request: &RankRequest) -> Ranking {
        let limit = request.limit.clamp(MIN_LIMIT, MAX_LIMIT) as usize;
        let total = self.rows.len();
        let avg_score = self.column_mean(SCORE_COLUMN);
        let habitable_count = self.habitable_count();

        if self.has_column(&request.sort_by) {
            let descending = request.order == SortOrder::Descending;
            self.rows.sort_by(|a, b| {
                let left = numeric_value(a, &request.sort_by);
                let right = numeric_value(b, &request.sort_by);
                match (left, right) {
                    (Some(l), Some(r)) => {
                        if descending {
                            r.total_cmp(&l)
                        } else {
                            l.total_cmp(&r)
                        }
                    }
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }

        self.rows.truncate(limit);
        Ranking {
            total,
            returned: self.rows.len(),
            avg_score,
            habitable_count,
            planets: self.rows,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
