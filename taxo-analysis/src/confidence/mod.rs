//! Confidence classification for consolidated groups.

pub mod classifier;
pub mod types;

pub use classifier::{summarize, ConfidenceClassifier};
pub use types::{ConfidenceSummary, ConfidenceTier, TierSummary};
