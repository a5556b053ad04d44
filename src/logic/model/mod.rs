//! Model Module - Artifact Format, Schema Alignment, Oracle

pub mod artifact;
pub mod oracle;
pub mod schema;

// Re-export common types
pub use artifact::ModelArtifact;
pub use oracle::{LoadedModel, ModelError, ModelOracle, OracleStatus};
pub use schema::{align, AlignedRow};
