//! Machine-readable error codes for downstream consumers.

pub const INPUT_ERROR: &str = "TAXO_INPUT";
pub const PROFILE_ERROR: &str = "TAXO_PROFILE";
pub const CONSOLIDATION_ERROR: &str = "TAXO_CONSOLIDATION";
pub const HIERARCHY_ERROR: &str = "TAXO_HIERARCHY";
pub const CONFIG_ERROR: &str = "TAXO_CONFIG";

/// Every subsystem error exposes a stable code string.
pub trait TaxoErrorCode {
    fn error_code(&self) -> &'static str;
}
