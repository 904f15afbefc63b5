//! Confidence tiers and per-tier summary statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How well a group's coverage statistics support treating it as a
/// genuine equipment category. Derived, never configured per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// At least one core code and core support above the high threshold.
    High,
    /// Core support between the medium and high thresholds.
    Medium,
    /// Weak or no core evidence.
    Low,
}

impl ConfidenceTier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate statistics for one confidence tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub tier: ConfidenceTier,
    pub group_count: usize,
    /// Mean number of distinct codes per group in this tier.
    pub avg_distinct_codes: f64,
    /// Mean coverage across core-tier codes of groups in this tier
    /// (groups with no core codes contribute nothing here).
    pub avg_core_coverage: f64,
}

/// Per-tier summaries plus the deep-analysis backlog size.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfidenceSummary {
    pub tiers: Vec<TierSummary>,
    pub needs_deeper_analysis: usize,
}

impl ConfidenceSummary {
    pub fn tier(&self, tier: ConfidenceTier) -> Option<&TierSummary> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}
