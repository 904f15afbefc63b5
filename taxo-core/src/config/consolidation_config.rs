//! Consolidation thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds governing coverage tiering, merging, hierarchy, and confidence.
///
/// Unset fields fall back to the compiled defaults via the `effective_*`
/// accessors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Coverage above which a code is core-tier. Default: 0.80.
    pub core_threshold: Option<f64>,
    /// Coverage above which a code is common-tier (up to core). Default: 0.50.
    pub common_threshold: Option<f64>,
    /// Jaccard similarity above which two groups merge. Default: 0.80.
    pub merge_threshold: Option<f64>,
    /// Jaccard similarity above which a parent/child edge is proposed.
    /// Must stay below the merge threshold. Default: 0.60.
    pub parent_threshold: Option<f64>,
    /// Core-support fraction above which a group is high confidence. Default: 0.80.
    pub confidence_high_threshold: Option<f64>,
    /// Core-support fraction above which a group is medium confidence. Default: 0.50.
    pub confidence_medium_threshold: Option<f64>,
}

impl ConsolidationConfig {
    /// Returns the effective core-tier coverage threshold, defaulting to 0.80.
    pub fn effective_core_threshold(&self) -> f64 {
        self.core_threshold.unwrap_or(0.80)
    }

    /// Returns the effective common-tier coverage threshold, defaulting to 0.50.
    pub fn effective_common_threshold(&self) -> f64 {
        self.common_threshold.unwrap_or(0.50)
    }

    /// Returns the effective merge threshold, defaulting to 0.80.
    pub fn effective_merge_threshold(&self) -> f64 {
        self.merge_threshold.unwrap_or(0.80)
    }

    /// Returns the effective parent threshold, defaulting to 0.60.
    pub fn effective_parent_threshold(&self) -> f64 {
        self.parent_threshold.unwrap_or(0.60)
    }

    /// Returns the effective high-confidence threshold, defaulting to 0.80.
    pub fn effective_confidence_high(&self) -> f64 {
        self.confidence_high_threshold.unwrap_or(0.80)
    }

    /// Returns the effective medium-confidence threshold, defaulting to 0.50.
    pub fn effective_confidence_medium(&self) -> f64 {
        self.confidence_medium_threshold.unwrap_or(0.50)
    }
}
