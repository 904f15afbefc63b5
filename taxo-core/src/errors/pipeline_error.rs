//! Pipeline errors and non-fatal error collection.

use super::error_code::TaxoErrorCode;
use super::{ConfigError, ConsolidationError, HierarchyError, InputError, ProfileError};

/// Errors that can occur during a consolidation run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TaxoErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Profile(e) => e.error_code(),
            Self::Consolidation(e) => e.error_code(),
            Self::Hierarchy(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result of a pipeline stage that accumulates non-fatal errors.
/// Allows partial results to be returned even when some groups fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupId;

    #[test]
    fn test_pipeline_error_codes_delegate() {
        let err: PipelineError = InputError::EmptyUniverse.into();
        assert_eq!(err.error_code(), super::super::error_code::INPUT_ERROR);

        let err: PipelineError = HierarchyError::CycleDetected {
            child: GroupId(1),
            parent: GroupId(2),
        }
        .into();
        assert_eq!(err.error_code(), super::super::error_code::HIERARCHY_ERROR);
    }

    #[test]
    fn test_pipeline_result_collects_errors() {
        let mut result: PipelineResult<u32> = PipelineResult::new(7);
        assert!(result.is_clean());
        result.add_error(InputError::EmptyUniverse.into());
        assert_eq!(result.error_count(), 1);
        assert!(!result.is_clean());
        assert_eq!(result.data, 7);
    }
}
