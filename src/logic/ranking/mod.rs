//! Ranking Module - Dataset Views & Analytics

pub mod reader;
pub mod stats;

// Re-export common types
pub use reader::{RankRequest, RankedDataset, Ranking, RankingError, SortOrder};
pub use stats::{compute_stats, DatasetStats};
