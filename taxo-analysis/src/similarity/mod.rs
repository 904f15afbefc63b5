//! Pairwise group similarity: exact Jaccard over core-tier code sets,
//! memoized with invalidate-on-merge semantics.

pub mod matrix;

pub use matrix::{jaccard_similarity, ScoredPair, SimilarityMatrix};
