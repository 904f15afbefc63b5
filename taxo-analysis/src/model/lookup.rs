//! Facility-to-code lookup: the profiler's input contract.
//!
//! Sourced once, up front, from the secondary validation dataset and held
//! in memory for the duration of the run.

use taxo_core::errors::InputError;
use taxo_core::types::collections::FxHashMap;
use taxo_core::types::{CodeId, FacilityId};

/// One discriminating code observed against a facility, with the number
/// of tag occurrences backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeObservation {
    pub code: CodeId,
    pub tag_count: u32,
}

/// Facility id -> observed codes, plus code -> human description.
#[derive(Debug, Default)]
pub struct CodeLookup {
    facility_codes: FxHashMap<FacilityId, Vec<CodeObservation>>,
    descriptions: FxHashMap<CodeId, String>,
}

impl CodeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a code observation for a facility. Repeat observations of
    /// the same code accumulate their tag counts.
    pub fn insert_observation(
        &mut self,
        facility_id: impl Into<FacilityId>,
        code: impl Into<CodeId>,
        tag_count: u32,
    ) {
        let code = code.into();
        let observations = self.facility_codes.entry(facility_id.into()).or_default();
        if let Some(existing) = observations.iter_mut().find(|o| o.code == code) {
            existing.tag_count = existing.tag_count.saturating_add(tag_count);
        } else {
            observations.push(CodeObservation { code, tag_count });
        }
    }

    /// Attach a human-readable description to a code.
    pub fn set_description(&mut self, code: impl Into<CodeId>, description: impl Into<String>) {
        self.descriptions.insert(code.into(), description.into());
    }

    /// Observations for a facility, or `None` when the facility has no
    /// entry at all (the `MissingFacilityData` case).
    pub fn codes_for(&self, facility_id: &str) -> Option<&[CodeObservation]> {
        self.facility_codes.get(facility_id).map(|v| v.as_slice())
    }

    pub fn description(&self, code: &str) -> Option<&str> {
        self.descriptions.get(code).map(|s| s.as_str())
    }

    /// Number of facilities with at least one observation.
    pub fn facility_count(&self) -> usize {
        self.facility_codes.len()
    }

    /// Fatal structural validation, run before any processing: empty
    /// facility ids, empty codes, or zero-tag observations indicate a
    /// malformed upstream join.
    pub fn validate(&self) -> Result<(), InputError> {
        for (facility_id, observations) in &self.facility_codes {
            if facility_id.is_empty() {
                return Err(InputError::MalformedLookup {
                    message: "empty facility id key".to_string(),
                });
            }
            for obs in observations {
                if obs.code.is_empty() {
                    return Err(InputError::MalformedLookup {
                        message: format!("empty code for facility {facility_id}"),
                    });
                }
                if obs.tag_count == 0 {
                    return Err(InputError::MalformedLookup {
                        message: format!(
                            "zero tag count for code {} on facility {facility_id}",
                            obs.code
                        ),
                    });
                }
            }
        }
        for code in self.descriptions.keys() {
            if code.is_empty() {
                return Err(InputError::MalformedLookup {
                    message: "empty code key in description table".to_string(),
                });
            }
        }
        Ok(())
    }
}
