//! Input validation errors.
//!
//! All of these are fatal and reported before any processing begins.

use crate::types::GroupId;

use super::error_code::{self, TaxoErrorCode};

/// Errors detected while validating seed groups and the code lookup.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("No seed equipment-type groups supplied; nothing to consolidate")]
    EmptyUniverse,

    #[error("Duplicate group id {id} in seed records")]
    DuplicateGroupId { id: GroupId },

    #[error("Malformed code lookup: {message}")]
    MalformedLookup { message: String },
}

impl TaxoErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        error_code::INPUT_ERROR
    }
}
