//! Configuration system for the taxonomy engine.
//! TOML-based: project file (`taxonomy.toml`) over compiled defaults.

pub mod consolidation_config;
pub mod report_config;
pub mod taxonomy_config;

pub use consolidation_config::ConsolidationConfig;
pub use report_config::ReportConfig;
pub use taxonomy_config::TaxonomyConfig;
