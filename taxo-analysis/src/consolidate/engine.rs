//! Greedy consolidation of near-duplicate groups.
//!
//! Pairs are processed in descending similarity order; a later merge can
//! never un-merge an earlier one. This is an accepted approximation of
//! optimal clustering given the exploratory nature of the taxonomy.

use serde::Serialize;
use tracing::{debug, info};

use taxo_core::config::ConsolidationConfig;
use taxo_core::errors::{ConsolidationError, PipelineResult};
use taxo_core::types::collections::FxHashSet;
use taxo_core::types::GroupId;

use crate::model::{CodeLookup, GroupArena};
use crate::profile::CoverageProfiler;
use crate::similarity::SimilarityMatrix;

/// Audit record of one merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeEvent {
    pub target: GroupId,
    pub source: GroupId,
    pub source_name: String,
    pub similarity: f64,
}

/// Applies the merge threshold to the similarity matrix until no live
/// pair exceeds it.
pub struct ConsolidationEngine {
    merge_threshold: f64,
    profiler: CoverageProfiler,
}

impl ConsolidationEngine {
    pub fn new(config: &ConsolidationConfig) -> Self {
        Self {
            merge_threshold: config.effective_merge_threshold(),
            profiler: CoverageProfiler::new(config),
        }
    }

    /// Run consolidation to a fixed point.
    ///
    /// Each sweep walks the surviving pairs in descending similarity
    /// order and merges the smaller group into the larger (equal sizes:
    /// the lower id is the target). Pairs touching a group whose
    /// membership changed earlier in the sweep are stale and deferred to
    /// the next sweep; pairs touching neither remain valid and are still
    /// processed. Terminates when a sweep performs zero merges, so
    /// re-running on the engine's own output is a no-op.
    pub fn run(
        &self,
        arena: &mut GroupArena,
        lookup: &CodeLookup,
        matrix: &mut SimilarityMatrix,
    ) -> PipelineResult<Vec<MergeEvent>> {
        let mut result: PipelineResult<Vec<MergeEvent>> = PipelineResult::default();

        loop {
            let pairs = matrix.pairs_above(arena, self.merge_threshold);
            debug!(candidates = pairs.len(), "consolidation sweep");
            if pairs.is_empty() {
                break;
            }

            let mut touched: FxHashSet<GroupId> = FxHashSet::default();
            let mut merged_this_sweep = 0usize;

            for pair in pairs {
                if !arena.is_live(pair.a) || !arena.is_live(pair.b) {
                    continue;
                }
                // Similarities involving a group merged this sweep are
                // stale until the next sweep recomputes them.
                if touched.contains(&pair.a) || touched.contains(&pair.b) {
                    continue;
                }

                let (target, source) = pick_target(arena, pair.a, pair.b);
                self.merge(arena, lookup, matrix, target, source, &mut result);
                result.data.push(MergeEvent {
                    target,
                    source,
                    source_name: arena
                        .get(source)
                        .map(|g| g.name.clone())
                        .unwrap_or_default(),
                    similarity: pair.similarity,
                });
                touched.insert(pair.a);
                touched.insert(pair.b);
                merged_this_sweep += 1;
            }

            if merged_this_sweep == 0 {
                break;
            }
        }

        result
    }

    /// Merge `source` into `target`: facility set union, provenance
    /// append, source tombstoned, both matrix rows invalidated, target
    /// re-profiled before any further comparison.
    fn merge(
        &self,
        arena: &mut GroupArena,
        lookup: &CodeLookup,
        matrix: &mut SimilarityMatrix,
        target: GroupId,
        source: GroupId,
        result: &mut PipelineResult<Vec<MergeEvent>>,
    ) {
        let Some(src) = arena.get(source) else {
            result.add_error(ConsolidationError::UnknownGroup { id: source }.into());
            return;
        };
        let src_name = src.name.clone();
        let src_facilities: Vec<String> = src.facility_ids.iter().cloned().collect();
        let src_merged_from = src.merged_from.clone();

        info!(%target, %source, name = %src_name, "merging group");

        if let Some(tgt) = arena.get_mut(target) {
            tgt.facility_ids.extend(src_facilities);
            // Source name first, then the groups that had already been
            // absorbed into the source, so provenance chains survive
            // transitive merges.
            tgt.merged_from.push(src_name);
            tgt.merged_from.extend(src_merged_from);
        } else {
            result.add_error(ConsolidationError::UnknownGroup { id: target }.into());
            return;
        }

        arena.tombstone(source);
        matrix.invalidate(target);
        matrix.invalidate(source);

        for err in self.profiler.reprofile(arena, target, lookup) {
            result.add_error(err.into());
        }

        if let Some(tgt) = arena.get(target) {
            if tgt.facility_ids.is_empty() {
                result.add_error(
                    ConsolidationError::DegenerateGroup {
                        id: target,
                        name: tgt.name.clone(),
                    }
                    .into(),
                );
            }
        }
    }
}

/// The larger group (by facility count) survives as the merge target;
/// equal sizes fall back to the lower numeric id for determinism.
fn pick_target(arena: &GroupArena, a: GroupId, b: GroupId) -> (GroupId, GroupId) {
    let count_a = arena.get(a).map(|g| g.facility_count()).unwrap_or(0);
    let count_b = arena.get(b).map(|g| g.facility_count()).unwrap_or(0);
    if count_a > count_b {
        (a, b)
    } else if count_b > count_a {
        (b, a)
    } else if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeedGroup;

    fn seed(id: u32, name: &str, facilities: &[&str]) -> SeedGroup {
        SeedGroup {
            id: GroupId(id),
            name: name.to_string(),
            facility_ids: facilities.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Arena + lookup where groups 1 and 2 share identical core codes
    /// (Jaccard 1.0) and group 3 is unrelated.
    fn identical_pair_fixture() -> (GroupArena, CodeLookup) {
        let mut lookup = CodeLookup::new();
        for facility in ["F1", "F2", "F3"] {
            lookup.insert_observation(facility, "FLOWRATE", 2);
            lookup.insert_observation(facility, "PRESSLINE", 1);
        }
        for facility in ["F4", "F5"] {
            lookup.insert_observation(facility, "FLOWRATE", 1);
            lookup.insert_observation(facility, "PRESSLINE", 1);
        }
        lookup.insert_observation("F6", "VIBRATION", 1);

        let arena = GroupArena::from_seeds(vec![
            seed(1, "Flow Meters", &["F1", "F2", "F3"]),
            seed(2, "Flow Meters (dup)", &["F4", "F5"]),
            seed(3, "Vibration Sensors", &["F6"]),
        ])
        .unwrap();
        (arena, lookup)
    }

    fn run_engine(arena: &mut GroupArena, lookup: &CodeLookup) -> Vec<MergeEvent> {
        let config = ConsolidationConfig::default();
        let profiler = CoverageProfiler::new(&config);
        profiler.profile_all(arena, lookup);
        let mut matrix = SimilarityMatrix::new();
        ConsolidationEngine::new(&config)
            .run(arena, lookup, &mut matrix)
            .data
    }

    #[test]
    fn test_identical_core_sets_merge_smaller_into_larger() {
        let (mut arena, lookup) = identical_pair_fixture();
        let events = run_engine(&mut arena, &lookup);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, GroupId(1));
        assert_eq!(events[0].source, GroupId(2));
        assert!((events[0].similarity - 1.0).abs() < 1e-10);

        let target = arena.get(GroupId(1)).unwrap();
        assert_eq!(target.facility_count(), 5);
        assert_eq!(target.merged_from.as_slice(), ["Flow Meters (dup)"]);
        assert!(!arena.is_live(GroupId(2)));
        assert!(arena.is_live(GroupId(3)));
    }

    #[test]
    fn test_related_but_distinct_groups_do_not_merge() {
        // Core sets {FLOWGAS, PRESSLINE} vs {FLOWGAS, PRESSLINE, TEMPGAS}:
        // Jaccard 2/3, below the 0.80 merge threshold.
        let mut lookup = CodeLookup::new();
        for facility in ["F1", "F2"] {
            lookup.insert_observation(facility, "FLOWGAS", 1);
            lookup.insert_observation(facility, "PRESSLINE", 1);
        }
        lookup.insert_observation("F3", "FLOWGAS", 1);
        lookup.insert_observation("F3", "PRESSLINE", 1);
        lookup.insert_observation("F3", "TEMPGAS", 1);

        let mut arena = GroupArena::from_seeds(vec![
            seed(1, "Gas Meters", &["F1", "F2"]),
            seed(2, "Gas Meters w/ Temp", &["F3"]),
        ])
        .unwrap();
        let events = run_engine(&mut arena, &lookup);
        assert!(events.is_empty());
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn test_rerun_on_own_output_is_noop() {
        let (mut arena, lookup) = identical_pair_fixture();
        let first = run_engine(&mut arena, &lookup);
        assert_eq!(first.len(), 1);
        let second = run_engine(&mut arena, &lookup);
        assert!(second.is_empty(), "consolidation must be idempotent");
    }

    #[test]
    fn test_equal_size_tie_breaks_to_lower_id() {
        let mut lookup = CodeLookup::new();
        for facility in ["F1", "F2"] {
            lookup.insert_observation(facility, "FLOWRATE", 1);
        }
        let mut arena = GroupArena::from_seeds(vec![
            seed(7, "Seven", &["F1"]),
            seed(4, "Four", &["F2"]),
        ])
        .unwrap();
        let events = run_engine(&mut arena, &lookup);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, GroupId(4));
        assert_eq!(events[0].source, GroupId(7));
    }

    #[test]
    fn test_transitive_merge_carries_provenance_chain() {
        // Three groups with identical core sets collapse into one; the
        // survivor's merged_from lists every absorbed name.
        let mut lookup = CodeLookup::new();
        for facility in ["F1", "F2", "F3", "F4", "F5", "F6"] {
            lookup.insert_observation(facility, "FLOWRATE", 1);
        }
        let mut arena = GroupArena::from_seeds(vec![
            seed(1, "A", &["F1", "F2", "F3"]),
            seed(2, "B", &["F4", "F5"]),
            seed(3, "C", &["F6"]),
        ])
        .unwrap();
        let events = run_engine(&mut arena, &lookup);
        assert_eq!(events.len(), 2);
        assert_eq!(arena.live_count(), 1);

        let survivor = arena.get(GroupId(1)).unwrap();
        assert_eq!(survivor.facility_count(), 6);
        let names: Vec<&str> = survivor.merged_from.iter().map(|s| s.as_str()).collect();
        assert!(names.contains(&"B"));
        assert!(names.contains(&"C"));
    }

    #[test]
    fn test_facility_sets_only_grow() {
        let (mut arena, lookup) = identical_pair_fixture();
        let before: Vec<(GroupId, usize)> = arena
            .live_ids()
            .iter()
            .map(|&id| (id, arena.get(id).unwrap().facility_count()))
            .collect();
        run_engine(&mut arena, &lookup);
        for (id, count_before) in before {
            // Surviving or not, no group's facility set ever shrinks.
            assert!(arena.get(id).unwrap().facility_count() >= count_before);
        }
    }
}
