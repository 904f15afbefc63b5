//! Structured record output for downstream consumers.
//!
//! The contract is stable key names and nesting, not byte-exact
//! formatting. Records are keyed and sorted by group id.

use serde::Serialize;

use taxo_core::types::collections::FxHashSet;
use taxo_core::types::{CodeId, GroupId};

use crate::confidence::ConfidenceTier;
use crate::model::{CodeLookup, GroupArena};
use crate::profile::CoverageTier;

/// One code with its coverage statistics, as exported per tier.
#[derive(Debug, Clone, Serialize)]
pub struct CodeEntry {
    pub code: CodeId,
    pub coverage: f64,
    pub facility_count: u32,
    pub tag_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Flat export of one live group: identity, provenance, hierarchy
/// position, confidence, and the per-tier code breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub name: String,
    pub parent_id: Option<GroupId>,
    pub merged_from: Vec<String>,
    pub facility_count: usize,
    pub confidence: Option<ConfidenceTier>,
    pub needs_deeper_analysis: bool,
    pub core_codes: Vec<CodeEntry>,
    pub common_codes: Vec<CodeEntry>,
    pub optional_codes: Vec<CodeEntry>,
}

fn tier_entries(
    arena: &GroupArena,
    lookup: &CodeLookup,
    id: GroupId,
    tier: CoverageTier,
) -> Vec<CodeEntry> {
    let Some(group) = arena.get(id) else {
        return Vec::new();
    };
    group
        .codes_in_tier(tier)
        .into_iter()
        .map(|(code, cov)| CodeEntry {
            code: code.clone(),
            coverage: cov.coverage,
            facility_count: cov.facility_count,
            tag_count: cov.tag_count,
            description: lookup.description(code).map(|d| d.to_string()),
        })
        .collect()
}

/// Export every live group except the excluded (degenerate) ones,
/// sorted by id.
pub fn to_records(
    arena: &GroupArena,
    lookup: &CodeLookup,
    excluded: &FxHashSet<GroupId>,
) -> Vec<GroupRecord> {
    arena
        .live_ids()
        .into_iter()
        .filter(|id| !excluded.contains(id))
        .filter_map(|id| {
            let group = arena.get(id)?;
            Some(GroupRecord {
                id,
                name: group.name.clone(),
                parent_id: group.parent,
                merged_from: group.merged_from.iter().cloned().collect(),
                facility_count: group.facility_count(),
                confidence: group.confidence,
                needs_deeper_analysis: group.needs_deeper_analysis,
                core_codes: tier_entries(arena, lookup, id, CoverageTier::Core),
                common_codes: tier_entries(arena, lookup, id, CoverageTier::Common),
                optional_codes: tier_entries(arena, lookup, id, CoverageTier::Optional),
            })
        })
        .collect()
}

/// Pretty-printed JSON for the record set.
pub fn to_json(records: &[GroupRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
