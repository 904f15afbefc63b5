//! Hierarchy discovery: parent/child forest over the consolidated groups.

pub mod builder;

pub use builder::{HierarchyBuilder, HierarchyForest, ParentEdge};
