//! Aggregation of enriched comments.
//!
//! Computes global field summaries, per-key groupings and the dataset
//! overview that the reporting step renders.

pub mod aggregate;
pub mod analyzer;
pub mod types;
