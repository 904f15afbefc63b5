//! Coverage profiler: populates `code_coverage` for a group from the
//! facility-to-code lookup.

use tracing::warn;

use taxo_core::config::ConsolidationConfig;
use taxo_core::errors::ProfileError;
use taxo_core::types::collections::{FxHashMap, FxHashSet};
use taxo_core::types::{CodeId, GroupId};

use crate::model::{CodeLookup, EquipmentType, GroupArena};

use super::types::{CodeCoverage, CoverageTier};

/// Computes per-code coverage and tiers for equipment-type groups.
///
/// The profiler is the only writer of `code_coverage` and must re-run on a
/// group whenever its `facility_ids` changes.
#[derive(Debug, Clone)]
pub struct CoverageProfiler {
    core_threshold: f64,
    common_threshold: f64,
}

impl CoverageProfiler {
    pub fn new(config: &ConsolidationConfig) -> Self {
        Self {
            core_threshold: config.effective_core_threshold(),
            common_threshold: config.effective_common_threshold(),
        }
    }

    /// Profile one group in place.
    ///
    /// Coverage for every code observed among any member facility (not
    /// only codes present in all members): |facilities with code| /
    /// |facility_ids|. Facilities absent from the lookup contribute zero
    /// coverage; each one is returned as a `MissingFacilityData` record
    /// and kept on the group for audit. The partial profile is still
    /// produced.
    pub fn profile(&self, group: &mut EquipmentType, lookup: &CodeLookup) -> Vec<ProfileError> {
        group.code_coverage.clear();
        group.missing_facilities.clear();

        let total = group.facility_count();
        if total == 0 {
            return Vec::new();
        }

        // Deterministic accumulation order; the math is order-independent
        // but the audit list should not depend on hash ordering.
        let mut members: Vec<String> = group.facility_ids.iter().cloned().collect();
        members.sort();

        let mut code_facilities: FxHashMap<CodeId, FxHashSet<&str>> = FxHashMap::default();
        let mut code_tags: FxHashMap<CodeId, u64> = FxHashMap::default();
        let mut errors = Vec::new();

        for facility_id in &members {
            match lookup.codes_for(facility_id) {
                Some(observations) => {
                    for obs in observations {
                        code_facilities
                            .entry(obs.code.clone())
                            .or_default()
                            .insert(facility_id.as_str());
                        *code_tags.entry(obs.code.clone()).or_insert(0) += u64::from(obs.tag_count);
                    }
                }
                None => {
                    warn!(
                        group = %group.id,
                        facility = %facility_id,
                        "facility missing from code lookup; contributes zero coverage"
                    );
                    group.missing_facilities.push(facility_id.clone());
                    errors.push(ProfileError::MissingFacilityData {
                        group_id: group.id,
                        facility_id: facility_id.clone(),
                    });
                }
            }
        }

        for (code, facilities) in code_facilities {
            let facility_count = facilities.len() as u32;
            let coverage = f64::from(facility_count) / total as f64;
            let tag_count = code_tags.get(&code).copied().unwrap_or(0);
            group.code_coverage.insert(
                code,
                CodeCoverage {
                    facility_count,
                    tag_count,
                    coverage,
                    tier: CoverageTier::from_coverage(
                        coverage,
                        self.core_threshold,
                        self.common_threshold,
                    ),
                },
            );
        }

        errors
    }

    /// Profile every live group in the arena, in id order.
    pub fn profile_all(&self, arena: &mut GroupArena, lookup: &CodeLookup) -> Vec<ProfileError> {
        let mut errors = Vec::new();
        for id in arena.live_ids() {
            if let Some(group) = arena.get_mut(id) {
                errors.extend(self.profile(group, lookup));
            }
        }
        errors
    }

    /// Re-profile a single group by id, after its membership changed.
    pub fn reprofile(
        &self,
        arena: &mut GroupArena,
        id: GroupId,
        lookup: &CodeLookup,
    ) -> Vec<ProfileError> {
        match arena.get_mut(id) {
            Some(group) => self.profile(group, lookup),
            None => Vec::new(),
        }
    }
}
