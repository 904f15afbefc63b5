//! Hierarchy building errors.

use crate::types::GroupId;

use super::error_code::{self, TaxoErrorCode};

/// Errors that can occur during parent/child assignment.
///
/// `CycleDetected` is recovered locally by refusing the single offending
/// edge; the candidate keeps its prior parent or stays a root.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HierarchyError {
    #[error("Parent edge {child} -> {parent} would create a cycle; edge refused")]
    CycleDetected { child: GroupId, parent: GroupId },
}

impl TaxoErrorCode for HierarchyError {
    fn error_code(&self) -> &'static str {
        error_code::HIERARCHY_ERROR
    }
}
