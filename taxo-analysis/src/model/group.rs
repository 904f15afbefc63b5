//! Equipment-type group records.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use taxo_core::types::collections::{FxHashMap, FxHashSet};
use taxo_core::types::{CodeId, FacilityId, GroupId};

use crate::confidence::ConfidenceTier;
use crate::profile::{CodeCoverage, CoverageTier};

/// Provisional equipment-type group as supplied by the discovery phases.
///
/// No coverage or hierarchy fields are populated yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGroup {
    pub id: GroupId,
    pub name: String,
    pub facility_ids: Vec<FacilityId>,
}

/// An equipment-type group under consolidation.
///
/// Identity is the stable `id`, assigned at seed creation and never reused.
/// `facility_ids` only grows; once `is_merged_away` is set the group is
/// excluded from all further comparisons and rendering but stays in the
/// arena so its `merged_from` attribution remains queryable for audit.
#[derive(Debug, Clone)]
pub struct EquipmentType {
    pub id: GroupId,
    /// Human-assigned label, supplied externally. Opaque to the engine.
    pub name: String,
    pub facility_ids: FxHashSet<FacilityId>,
    /// Code -> coverage statistics. Recomputed by the profiler whenever
    /// `facility_ids` changes; nothing else writes it.
    pub code_coverage: FxHashMap<CodeId, CodeCoverage>,
    /// Derived confidence tier, set by the classifier after the hierarchy
    /// stabilizes. `None` until then.
    pub confidence: Option<ConfidenceTier>,
    /// Set for groups with no core-tier code at all. Terminal
    /// recommendation for a human reviewer; never auto-resolved here.
    pub needs_deeper_analysis: bool,
    /// Names of groups absorbed into this one, in merge order.
    pub merged_from: SmallVec<[String; 2]>,
    /// Parent group in the discovered hierarchy, if any.
    pub parent: Option<GroupId>,
    /// Similarity of the winning parent edge. Tracked so a later, weaker
    /// candidate edge cannot displace a stronger one.
    pub parent_similarity: Option<f64>,
    /// Tombstone. Once set it never clears.
    pub is_merged_away: bool,
    /// Facility ids that had no entry in the code lookup during the last
    /// profile pass. Kept for audit; they contribute zero coverage.
    pub missing_facilities: Vec<FacilityId>,
}

impl EquipmentType {
    /// Create a fresh group from a seed record. Duplicate facility ids in
    /// the seed collapse into the set.
    pub fn from_seed(seed: SeedGroup) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            facility_ids: seed.facility_ids.into_iter().collect(),
            code_coverage: FxHashMap::default(),
            confidence: None,
            needs_deeper_analysis: false,
            merged_from: SmallVec::new(),
            parent: None,
            parent_similarity: None,
            is_merged_away: false,
            missing_facilities: Vec::new(),
        }
    }

    pub fn facility_count(&self) -> usize {
        self.facility_ids.len()
    }

    /// Coverage tier of a code, if the code was observed in this group.
    pub fn tier_of(&self, code: &str) -> Option<CoverageTier> {
        self.code_coverage.get(code).map(|c| c.tier)
    }

    /// The core-tier code set. This is the evidentiary basis for
    /// similarity: common/optional codes are too generic to indicate
    /// real overlap.
    pub fn core_codes(&self) -> FxHashSet<CodeId> {
        self.code_coverage
            .iter()
            .filter(|(_, cov)| cov.tier == CoverageTier::Core)
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// Codes in the given tier, sorted by coverage descending then code
    /// ascending, for deterministic rendering.
    pub fn codes_in_tier(&self, tier: CoverageTier) -> Vec<(&CodeId, &CodeCoverage)> {
        let mut codes: Vec<(&CodeId, &CodeCoverage)> = self
            .code_coverage
            .iter()
            .filter(|(_, cov)| cov.tier == tier)
            .collect();
        codes.sort_by(|(code_a, cov_a), (code_b, cov_b)| {
            cov_b
                .coverage
                .total_cmp(&cov_a.coverage)
                .then_with(|| code_a.cmp(code_b))
        });
        codes
    }

    /// Sample of facility ids for report output, sorted for determinism.
    pub fn sample_facilities(&self, limit: usize) -> Vec<&FacilityId> {
        let mut sample: Vec<&FacilityId> = self.facility_ids.iter().collect();
        sample.sort();
        sample.truncate(limit);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_group(id: u32, facilities: &[&str]) -> EquipmentType {
        EquipmentType::from_seed(SeedGroup {
            id: GroupId(id),
            name: format!("group-{id}"),
            facility_ids: facilities.iter().map(|f| f.to_string()).collect(),
        })
    }

    #[test]
    fn test_from_seed_dedups_facilities() {
        let group = make_group(1, &["F1", "F2", "F1"]);
        assert_eq!(group.facility_count(), 2);
        assert!(!group.is_merged_away);
        assert!(group.merged_from.is_empty());
    }

    #[test]
    fn test_core_codes_filters_by_tier() {
        let mut group = make_group(1, &["F1", "F2"]);
        group.code_coverage.insert(
            "FLOWGAS".to_string(),
            CodeCoverage {
                facility_count: 2,
                tag_count: 4,
                coverage: 1.0,
                tier: CoverageTier::Core,
            },
        );
        group.code_coverage.insert(
            "COMPRATIO".to_string(),
            CodeCoverage {
                facility_count: 1,
                tag_count: 1,
                coverage: 0.5,
                tier: CoverageTier::Optional,
            },
        );
        let core = group.core_codes();
        assert_eq!(core.len(), 1);
        assert!(core.contains("FLOWGAS"));
        assert_eq!(group.tier_of("COMPRATIO"), Some(CoverageTier::Optional));
        assert_eq!(group.tier_of("UNSEEN"), None);
    }

    #[test]
    fn test_codes_in_tier_sorted_by_coverage_then_code() {
        let mut group = make_group(1, &["F1", "F2", "F3", "F4"]);
        for (code, coverage) in [("B", 0.9), ("A", 0.9), ("C", 0.95)] {
            group.code_coverage.insert(
                code.to_string(),
                CodeCoverage {
                    facility_count: 4,
                    tag_count: 4,
                    coverage,
                    tier: CoverageTier::Core,
                },
            );
        }
        let ordered: Vec<&str> = group
            .codes_in_tier(CoverageTier::Core)
            .into_iter()
            .map(|(code, _)| code.as_str())
            .collect();
        assert_eq!(ordered, vec!["C", "A", "B"]);
    }
}
