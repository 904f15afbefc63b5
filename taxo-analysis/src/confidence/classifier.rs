//! Confidence derivation from coverage statistics.

use tracing::debug;

use taxo_core::config::ConsolidationConfig;
use taxo_core::types::collections::FxHashSet;
use taxo_core::types::CodeId;

use crate::model::{CodeLookup, EquipmentType, GroupArena};
use crate::profile::CoverageTier;

use super::types::{ConfidenceSummary, ConfidenceTier, TierSummary};

/// Derives a confidence tier per group from its core-tier evidence.
pub struct ConfidenceClassifier {
    high_threshold: f64,
    medium_threshold: f64,
}

impl ConfidenceClassifier {
    pub fn new(config: &ConsolidationConfig) -> Self {
        Self {
            high_threshold: config.effective_confidence_high(),
            medium_threshold: config.effective_confidence_medium(),
        }
    }

    /// Classify one group.
    ///
    /// Support is the fraction of member facilities exhibiting the
    /// group's full core-tier code set. Any single core code covers more
    /// than the core threshold of members by definition, so the joint
    /// support is what separates coherent groups (misses concentrated in
    /// a few members) from loose ones (misses spread everywhere).
    /// Facilities missing from the lookup count against support.
    ///
    /// A group with no core codes at all is `Low` and gets the
    /// `needs_deeper_analysis` flag, a terminal recommendation for a
    /// human reviewer. Nothing here auto-resolves it.
    pub fn classify(&self, group: &EquipmentType, lookup: &CodeLookup) -> (ConfidenceTier, bool) {
        let core: FxHashSet<CodeId> = group.core_codes();
        if core.is_empty() {
            return (ConfidenceTier::Low, true);
        }

        let total = group.facility_count();
        if total == 0 {
            return (ConfidenceTier::Low, true);
        }

        let supported = group
            .facility_ids
            .iter()
            .filter(|facility| {
                lookup.codes_for(facility).is_some_and(|observations| {
                    let observed: FxHashSet<&str> =
                        observations.iter().map(|o| o.code.as_str()).collect();
                    core.iter().all(|code| observed.contains(code.as_str()))
                })
            })
            .count();
        let support = supported as f64 / total as f64;

        let tier = if support > self.high_threshold {
            ConfidenceTier::High
        } else if support > self.medium_threshold {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        };
        (tier, false)
    }

    /// Classify every live group in the arena, in id order.
    pub fn classify_all(&self, arena: &mut GroupArena, lookup: &CodeLookup) {
        for id in arena.live_ids() {
            let Some(group) = arena.get(id) else { continue };
            let (tier, flag) = self.classify(group, lookup);
            debug!(group = %id, confidence = %tier, needs_deeper_analysis = flag, "classified");
            if let Some(group) = arena.get_mut(id) {
                group.confidence = Some(tier);
                group.needs_deeper_analysis = flag;
            }
        }
    }
}

/// Summarize classified live groups per confidence tier.
pub fn summarize(arena: &GroupArena) -> ConfidenceSummary {
    let mut summary = ConfidenceSummary::default();
    for tier in [
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
    ] {
        let mut group_count = 0usize;
        let mut distinct_codes = 0usize;
        let mut core_coverages: Vec<f64> = Vec::new();
        for id in arena.live_ids() {
            let Some(group) = arena.get(id) else { continue };
            if group.confidence != Some(tier) {
                continue;
            }
            group_count += 1;
            distinct_codes += group.code_coverage.len();
            for (_, cov) in group.codes_in_tier(CoverageTier::Core) {
                core_coverages.push(cov.coverage);
            }
        }
        let avg_distinct_codes = if group_count > 0 {
            distinct_codes as f64 / group_count as f64
        } else {
            0.0
        };
        let avg_core_coverage = if core_coverages.is_empty() {
            0.0
        } else {
            core_coverages.iter().sum::<f64>() / core_coverages.len() as f64
        };
        summary.tiers.push(TierSummary {
            tier,
            group_count,
            avg_distinct_codes,
            avg_core_coverage,
        });
    }
    summary.needs_deeper_analysis = arena
        .live_ids()
        .iter()
        .filter(|&&id| arena.get(id).is_some_and(|g| g.needs_deeper_analysis))
        .count();
    summary
}
