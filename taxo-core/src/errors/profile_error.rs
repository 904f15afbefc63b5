//! Coverage profiling errors.

use crate::types::{FacilityId, GroupId};

use super::error_code::{self, TaxoErrorCode};

/// Errors that can occur while profiling a group's code coverage.
///
/// `MissingFacilityData` is recovered locally: the facility contributes
/// zero coverage and the partial profile is still produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("Facility {facility_id} in group {group_id} has no entry in the code lookup")]
    MissingFacilityData {
        group_id: GroupId,
        facility_id: FacilityId,
    },
}

impl TaxoErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        error_code::PROFILE_ERROR
    }
}
