//! Top-level engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConsolidationConfig, ReportConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Project config (`taxonomy.toml` in the run root)
/// 2. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub consolidation: ConsolidationConfig,
    pub report: ReportConfig,
}

impl TaxonomyConfig {
    /// Load configuration from `taxonomy.toml` in `root`, if present.
    /// Falls back to compiled defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join("taxonomy.toml");
        let config = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// Every threshold must sit in [0, 1]; the parent threshold must stay
    /// strictly below the merge threshold (values between them mean
    /// "related but distinct"); the common tier boundary must stay below
    /// the core boundary.
    pub fn validate(config: &TaxonomyConfig) -> Result<(), ConfigError> {
        let c = &config.consolidation;
        let unit_fields: [(&str, f64); 6] = [
            ("consolidation.core_threshold", c.effective_core_threshold()),
            (
                "consolidation.common_threshold",
                c.effective_common_threshold(),
            ),
            ("consolidation.merge_threshold", c.effective_merge_threshold()),
            (
                "consolidation.parent_threshold",
                c.effective_parent_threshold(),
            ),
            (
                "consolidation.confidence_high_threshold",
                c.effective_confidence_high(),
            ),
            (
                "consolidation.confidence_medium_threshold",
                c.effective_confidence_medium(),
            ),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if c.effective_parent_threshold() >= c.effective_merge_threshold() {
            return Err(ConfigError::ValidationFailed {
                field: "consolidation.parent_threshold".to_string(),
                message: "must be strictly below the merge threshold".to_string(),
            });
        }
        if c.effective_common_threshold() >= c.effective_core_threshold() {
            return Err(ConfigError::ValidationFailed {
                field: "consolidation.common_threshold".to_string(),
                message: "must be strictly below the core threshold".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_overrides() {
        let config = TaxonomyConfig::from_toml(
            r#"
            [consolidation]
            merge_threshold = 0.85
            parent_threshold = 0.55

            [report]
            max_core_codes = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.consolidation.effective_merge_threshold(), 0.85);
        assert_eq!(config.consolidation.effective_parent_threshold(), 0.55);
        assert_eq!(config.report.effective_max_core_codes(), 8);
    }

    #[test]
    fn test_parent_must_stay_below_merge() {
        let err = TaxonomyConfig::from_toml(
            r#"
            [consolidation]
            merge_threshold = 0.60
            parent_threshold = 0.70
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::ValidationFailed { field, .. } => {
                assert_eq!(field, "consolidation.parent_threshold");
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let result = TaxonomyConfig::from_toml(
            r#"
            [consolidation]
            core_threshold = 1.5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaxonomyConfig::load(dir.path()).unwrap();
        assert_eq!(config.consolidation.effective_merge_threshold(), 0.80);
    }

    #[test]
    fn test_load_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("taxonomy.toml"),
            "[consolidation]\nmerge_threshold = 0.9\n",
        )
        .unwrap();
        let config = TaxonomyConfig::load(dir.path()).unwrap();
        assert_eq!(config.consolidation.effective_merge_threshold(), 0.9);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("taxonomy.toml"), "not [ valid").unwrap();
        let err = TaxonomyConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
