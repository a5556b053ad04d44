//! Logic Module - Scoring Engine
//!
//! The core behind the HTTP surface:
//! - `features/` - Observation cleaning, engineered indices, feature rows
//! - `model/` - Artifact format, schema alignment, Model Oracle
//! - `fusion` - Blending model probability with the physical indices
//! - `service` - Per-request orchestration
//! - `ranking/` - Ranked dataset views and analytics

pub mod features;
pub mod fusion;
pub mod model;
pub mod ranking;
pub mod service;
