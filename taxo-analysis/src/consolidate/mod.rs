//! Group consolidation: greedy merging of near-duplicate groups.

pub mod engine;

pub use engine::{ConsolidationEngine, MergeEvent};
