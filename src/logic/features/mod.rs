//! Features Module - Observation Cleaning & Engineered Indices
//!
//! Everything between a raw request body and a model-ready feature row.

pub mod indices;
pub mod observation;
pub mod transform;

// Re-export common types
pub use observation::Observation;
pub use transform::{transform, FeatureRow};
