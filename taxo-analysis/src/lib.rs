//! Taxonomy consolidation engine.
//!
//! Takes provisional equipment-type groups (statistical/semantic discovery
//! output), validates them against discriminating-code evidence from a
//! secondary dataset, merges near-duplicates, infers a parent/child forest
//! among the survivors, classifies confidence, and renders the result as a
//! tree report plus machine-readable records.
//!
//! Single-threaded, batch, run-to-completion: every stage finishes before
//! the next begins, and each merge invalidates the cached similarities it
//! touches before they are read again.

pub mod confidence;
pub mod consolidate;
pub mod hierarchy;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod render;
pub mod similarity;

pub use pipeline::{TaxonomyDiagnostics, TaxonomyPipeline, TaxonomyResult};
