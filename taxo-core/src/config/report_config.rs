//! Hierarchy report options.

use serde::{Deserialize, Serialize};

/// Options for the rendered hierarchy report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Maximum core-tier codes listed per group in the tree. Default: 5.
    pub max_core_codes: Option<usize>,
    /// Number of sample facility ids shown per group. Default: 3.
    pub sample_facilities: Option<usize>,
    /// Include common-tier codes in the tree view. Default: false.
    pub show_common_tier: Option<bool>,
}

impl ReportConfig {
    /// Returns the effective core-code cap, defaulting to 5.
    pub fn effective_max_core_codes(&self) -> usize {
        self.max_core_codes.unwrap_or(5)
    }

    /// Returns the effective sample facility count, defaulting to 3.
    pub fn effective_sample_facilities(&self) -> usize {
        self.sample_facilities.unwrap_or(3)
    }

    /// Returns whether the common tier appears in the tree, defaulting to false.
    pub fn effective_show_common_tier(&self) -> bool {
        self.show_common_tier.unwrap_or(false)
    }
}
