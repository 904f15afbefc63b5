//! Consolidation errors.

use crate::types::GroupId;

use super::error_code::{self, TaxoErrorCode};

/// Errors that can occur while merging near-duplicate groups.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConsolidationError {
    /// A group ended up with zero facilities. Should be unreachable given
    /// the set-union merge semantics, but guarded: the group is excluded
    /// from rendering and the run continues.
    #[error("Group {id} ({name}) has zero facilities after consolidation")]
    DegenerateGroup { id: GroupId, name: String },

    #[error("Group {id} not found in arena")]
    UnknownGroup { id: GroupId },
}

impl TaxoErrorCode for ConsolidationError {
    fn error_code(&self) -> &'static str {
        error_code::CONSOLIDATION_ERROR
    }
}
