//! Coverage statistics types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coverage-ratio buckets classifying how representative a code is of a
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageTier {
    /// coverage > core threshold (default 0.80): defining for the group.
    Core,
    /// common threshold < coverage <= core threshold: widespread but not
    /// defining.
    Common,
    /// coverage <= common threshold (default 0.50): too sparse to
    /// characterize the group.
    Optional,
}

impl CoverageTier {
    /// Classify a coverage ratio against the configured tier boundaries.
    pub fn from_coverage(coverage: f64, core_threshold: f64, common_threshold: f64) -> Self {
        if coverage > core_threshold {
            Self::Core
        } else if coverage > common_threshold {
            Self::Common
        } else {
            Self::Optional
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Common => "common",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-code coverage statistics within one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeCoverage {
    /// Member facilities exhibiting this code.
    pub facility_count: u32,
    /// Total tag occurrences of this code across member facilities.
    pub tag_count: u64,
    /// facility_count / group member count, in [0, 1].
    pub coverage: f64,
    /// Tier derived from `coverage` at profile time.
    pub tier: CoverageTier,
}
