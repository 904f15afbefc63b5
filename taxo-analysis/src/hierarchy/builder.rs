//! Parent/child assignment among consolidated groups.
//!
//! Runs after consolidation stabilizes, at a strictly lower threshold
//! than merging: similarity between the two thresholds means "related
//! but distinct", not "duplicate". The output is a forest; multiple
//! independent roots are expected and normal.

use serde::Serialize;
use tracing::{debug, warn};

use taxo_core::config::ConsolidationConfig;
use taxo_core::errors::{HierarchyError, PipelineResult};
use taxo_core::types::collections::FxHashMap;
use taxo_core::types::{CodeId, GroupId};

use crate::model::GroupArena;
use crate::similarity::SimilarityMatrix;

/// One accepted parent/child edge, with the shared core codes that
/// justified it.
#[derive(Debug, Clone, Serialize)]
pub struct ParentEdge {
    pub child: GroupId,
    pub parent: GroupId,
    pub similarity: f64,
    pub shared_codes: Vec<CodeId>,
}

/// The discovered forest: accepted edges, a children-of reverse lookup,
/// and the roots (isolated roots have no children of their own).
#[derive(Debug, Default)]
pub struct HierarchyForest {
    pub edges: Vec<ParentEdge>,
    pub children: FxHashMap<GroupId, Vec<GroupId>>,
    pub roots: Vec<GroupId>,
    pub isolated: Vec<GroupId>,
}

impl HierarchyForest {
    /// Children of a group, in decreasing facility-count order.
    pub fn children_of(&self, id: GroupId) -> &[GroupId] {
        self.children.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Assigns parent edges from the similarity matrix.
pub struct HierarchyBuilder {
    parent_threshold: f64,
}

impl HierarchyBuilder {
    pub fn new(config: &ConsolidationConfig) -> Self {
        Self {
            parent_threshold: config.effective_parent_threshold(),
        }
    }

    /// Build the forest over the live groups.
    ///
    /// Pairs are processed in descending similarity order. For each pair,
    /// the smaller group becomes the child of the larger (equal sizes:
    /// the lower id is the parent), unless the child already holds a
    /// higher-similarity edge or the edge would close a cycle. A refused
    /// cycle edge is recorded as a non-fatal `CycleDetected` and the
    /// child keeps its prior parent (or stays a root).
    pub fn build(
        &self,
        arena: &mut GroupArena,
        matrix: &mut SimilarityMatrix,
    ) -> PipelineResult<HierarchyForest> {
        let mut result: PipelineResult<HierarchyForest> = PipelineResult::default();
        let pairs = matrix.pairs_above(arena, self.parent_threshold);
        debug!(candidates = pairs.len(), "hierarchy sweep");

        for pair in pairs {
            if !arena.is_live(pair.a) || !arena.is_live(pair.b) {
                continue;
            }
            let (parent, child) = pick_parent(arena, pair.a, pair.b);

            // The higher-similarity edge wins. Descending order means the
            // first accepted edge for a child is the strongest, but the
            // policy is stated explicitly so it holds under any order.
            let prior = arena.get(child).and_then(|g| g.parent_similarity);
            if prior.is_some_and(|p| p >= pair.similarity) {
                continue;
            }

            if would_create_cycle(arena, child, parent) {
                warn!(%child, %parent, "parent edge refused: would create a cycle");
                result.add_error(HierarchyError::CycleDetected { child, parent }.into());
                continue;
            }

            let shared_codes = shared_core_codes(arena, parent, child);
            if let Some(group) = arena.get_mut(child) {
                group.parent = Some(parent);
                group.parent_similarity = Some(pair.similarity);
            }
            // Replace any weaker edge this child held.
            result.data.edges.retain(|e| e.child != child);
            result.data.edges.push(ParentEdge {
                child,
                parent,
                similarity: pair.similarity,
                shared_codes,
            });
        }

        let forest = &mut result.data;
        for id in arena.live_ids() {
            match arena.get(id).and_then(|g| g.parent) {
                Some(parent) => forest.children.entry(parent).or_default().push(id),
                None => forest.roots.push(id),
            }
        }
        // Decreasing facility count at each level, id as tie-break.
        let by_size = |ids: &mut Vec<GroupId>| {
            ids.sort_by_key(|&id| {
                (
                    std::cmp::Reverse(arena.get(id).map(|g| g.facility_count()).unwrap_or(0)),
                    id,
                )
            });
        };
        by_size(&mut forest.roots);
        for children in forest.children.values_mut() {
            by_size(children);
        }
        forest.isolated = forest
            .roots
            .iter()
            .copied()
            .filter(|root| !forest.children.contains_key(root))
            .collect();

        result
    }
}

/// The larger group (by facility count) is the parent candidate; equal
/// sizes fall back to the lower numeric id.
fn pick_parent(arena: &GroupArena, a: GroupId, b: GroupId) -> (GroupId, GroupId) {
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

/// Ancestor walk from `parent`: if it reaches `child`, the proposed edge
/// would close a cycle. The walk is bounded by the live-group count, so
/// it terminates even if an invariant were already broken.
fn would_create_cycle(arena: &GroupArena, child: GroupId, parent: GroupId) -> bool {
    let mut current = Some(parent);
    let mut steps = 0usize;
    let bound = arena.len() + 1;
    while let Some(id) = current {
        if id == child {
            return true;
        }
        steps += 1;
        if steps > bound {
            return true;
        }
        current = arena.get(id).and_then(|g| g.parent);
    }
    false
}

/// Sorted intersection of two groups' core-tier code sets.
fn shared_core_codes(arena: &GroupArena, a: GroupId, b: GroupId) -> Vec<CodeId> {
    let (Some(group_a), Some(group_b)) = (arena.get(a), arena.get(b)) else {
        return Vec::new();
    };
    let core_b = group_b.core_codes();
    let mut shared: Vec<CodeId> = group_a
        .core_codes()
        .into_iter()
        .filter(|code| core_b.contains(code))
        .collect();
    shared.sort();
    shared
}
