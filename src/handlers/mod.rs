//! HTTP handlers

pub mod health;
pub mod predict;
pub mod rank;
pub mod stats;
pub mod importance;
pub mod engine;
pub mod docs;
