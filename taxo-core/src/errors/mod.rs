//! Error handling for the taxonomy engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod consolidation_error;
pub mod error_code;
pub mod hierarchy_error;
pub mod input_error;
pub mod pipeline_error;
pub mod profile_error;

pub use config_error::ConfigError;
pub use consolidation_error::ConsolidationError;
pub use error_code::TaxoErrorCode;
pub use hierarchy_error::HierarchyError;
pub use input_error::InputError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use profile_error::ProfileError;
