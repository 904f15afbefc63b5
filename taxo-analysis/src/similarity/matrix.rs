//! Memoized similarity matrix over live groups.
//!
//! Group counts are tens, so the O(n²) exact computation is fine; the
//! memo exists so re-running after a merge does not recompute untouched
//! pairs. Entries are keyed by normalized id pair and dropped whenever a
//! group's membership changes.

use taxo_core::types::collections::{FxHashMap, FxHashSet};
use taxo_core::types::{CodeId, GroupId};

use crate::model::GroupArena;

/// Compute exact Jaccard similarity between two code sets.
///
/// J(A, B) = |A ∩ B| / |A ∪ B|
/// Returns 0.0 if both sets are empty.
pub fn jaccard_similarity(set_a: &FxHashSet<CodeId>, set_b: &FxHashSet<CodeId>) -> f64 {
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(set_b).count();
    let union = set_a.union(set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// A scored unordered group pair, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub a: GroupId,
    pub b: GroupId,
    pub similarity: f64,
}

/// Symmetric pairwise similarity over live groups, Jaccard on core-tier
/// code sets only. Common/optional codes are excluded: they are too
/// generic to indicate real overlap.
#[derive(Debug, Default)]
pub struct SimilarityMatrix {
    scores: FxHashMap<(GroupId, GroupId), f64>,
}

impl SimilarityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: GroupId, b: GroupId) -> (GroupId, GroupId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Similarity between two groups, computed on demand and memoized.
    pub fn similarity(&mut self, arena: &GroupArena, a: GroupId, b: GroupId) -> f64 {
        let key = Self::key(a, b);
        if let Some(&cached) = self.scores.get(&key) {
            return cached;
        }
        let score = match (arena.get(key.0), arena.get(key.1)) {
            (Some(group_a), Some(group_b)) => {
                jaccard_similarity(&group_a.core_codes(), &group_b.core_codes())
            }
            _ => 0.0,
        };
        self.scores.insert(key, score);
        score
    }

    /// Drop every cached entry involving `id`. Called after a merge so
    /// stale similarities are never read again.
    pub fn invalidate(&mut self, id: GroupId) {
        self.scores.retain(|&(a, b), _| a != id && b != id);
    }

    /// All live pairs with similarity strictly above `threshold`, in
    /// descending similarity order with an id-pair tie-break so iteration
    /// order is fully deterministic.
    pub fn pairs_above(&mut self, arena: &GroupArena, threshold: f64) -> Vec<ScoredPair> {
        let ids = arena.live_ids();
        let mut pairs = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let similarity = self.similarity(arena, a, b);
                if similarity > threshold {
                    pairs.push(ScoredPair { a, b, similarity });
                }
            }
        }
        pairs.sort_by(|x, y| {
            y.similarity
                .total_cmp(&x.similarity)
                .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
        });
        pairs
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
