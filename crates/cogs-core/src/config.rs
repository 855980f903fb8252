use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Tunable constants for the analysis pipeline.
///
/// Every field has a default, so an empty or partial TOML file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Share of community members that must use a part for it to count as
    /// that community's standard.
    #[serde(default = "default_demand_threshold")]
    pub demand_threshold: f64,
    /// Assortativity above this value is reported as a stratified market.
    /// Lies in `[-1, 1)`: at 1 no coefficient could ever exceed it.
    #[serde(default = "default_stratification_cutoff")]
    pub stratification_cutoff: f64,
    /// Number of top critical parts failed in the report's cascade run.
    #[serde(default = "default_cascade_depth")]
    pub cascade_depth: usize,
    #[serde(default)]
    pub segments: SegmentConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            demand_threshold: default_demand_threshold(),
            stratification_cutoff: default_stratification_cutoff(),
            cascade_depth: default_cascade_depth(),
            segments: SegmentConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    #[serde(default = "default_premium_keywords")]
    pub premium_keywords: Vec<String>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            premium_keywords: default_premium_keywords(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or a
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str::<Self>(&content)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply `COGS_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::BadOverride`] if an override is set but not
    /// a valid number.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Override resolution, separated from the process environment for
    /// testability.
    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup("COGS_DEMAND_THRESHOLD") {
            self.demand_threshold = parse_override("COGS_DEMAND_THRESHOLD", &raw)?;
        }
        if let Some(raw) = lookup("COGS_STRATIFICATION_CUTOFF") {
            self.stratification_cutoff = parse_override("COGS_STRATIFICATION_CUTOFF", &raw)?;
        }
        if let Some(raw) = lookup("COGS_CASCADE_DEPTH") {
            self.cascade_depth = parse_override("COGS_CASCADE_DEPTH", &raw)?;
        }
        Ok(self)
    }

    /// Reject values the analyses cannot interpret.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.demand_threshold > 0.0 && self.demand_threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange {
                field: "demand_threshold",
                value: self.demand_threshold,
            });
        }
        if !(-1.0..1.0).contains(&self.stratification_cutoff) {
            return Err(ConfigError::CutoffOutOfRange(self.stratification_cutoff));
        }
        if self.cascade_depth == 0 {
            return Err(ConfigError::ZeroCascadeDepth);
        }
        if self.segments.premium_keywords.is_empty() {
            return Err(ConfigError::NoPremiumKeywords);
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::BadOverride {
        var,
        value: raw.to_string(),
    })
}

const fn default_demand_threshold() -> f64 {
    0.7
}

const fn default_stratification_cutoff() -> f64 {
    0.1
}

const fn default_cascade_depth() -> usize {
    5
}

fn default_premium_keywords() -> Vec<String> {
    ["Audi", "BMW", "Mercedes", "Porsche", "Volvo", "Jeep"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AnalysisConfig::load(&dir.path().join("cogs.toml")).expect("load");
        assert_eq!(cfg, AnalysisConfig::default());
        assert!((cfg.demand_threshold - 0.7).abs() < f64::EPSILON);
        assert!((cfg.stratification_cutoff - 0.1).abs() < f64::EPSILON);
        assert_eq!(cfg.cascade_depth, 5);
        assert_eq!(cfg.segments.premium_keywords.len(), 6);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cogs.toml");
        std::fs::write(&path, "demand_threshold = 0.5\n\n[segments]\npremium_keywords = [\"Lux\"]\n")
            .expect("write");

        let cfg = AnalysisConfig::load(&path).expect("load");
        assert!((cfg.demand_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.cascade_depth, 5);
        assert_eq!(cfg.segments.premium_keywords, vec!["Lux".to_string()]);
    }

    #[test]
    fn unparsable_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cogs.toml");
        std::fs::write(&path, "cascade_depth = \"deep\"").expect("write");
        let err = AnalysisConfig::load(&path).expect_err("must fail");
        assert!(format!("{err:#}").contains("Failed to parse"));
        let cause = err.downcast_ref::<ConfigError>().expect("typed cause");
        assert!(matches!(cause, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("COGS_DEMAND_THRESHOLD", "0.9"),
            ("COGS_CASCADE_DEPTH", " 3 "),
        ]
        .into_iter()
        .collect();

        let cfg = AnalysisConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| (*v).to_string()))
            .expect("overrides");
        assert!((cfg.demand_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(cfg.cascade_depth, 3);
        assert!((cfg.stratification_cutoff - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_override_is_an_error() {
        let err = AnalysisConfig::default()
            .with_overrides_from(|key| {
                (key == "COGS_STRATIFICATION_CUTOFF").then(|| "high".to_string())
            })
            .expect_err("must fail");
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::BadOverride {
                var: "COGS_STRATIFICATION_CUTOFF",
                value: "high".to_string(),
            })
        );
    }

    #[test]
    fn cutoff_accepts_the_coefficient_range() {
        for cutoff in [-1.0, -0.3, 0.0, 0.1, 0.99] {
            let cfg = AnalysisConfig {
                stratification_cutoff: cutoff,
                ..AnalysisConfig::default()
            };
            assert_eq!(cfg.validate(), Ok(()), "cutoff {cutoff}");
        }
        for cutoff in [-1.5, 1.0, 1.5, f64::NAN] {
            let cfg = AnalysisConfig {
                stratification_cutoff: cutoff,
                ..AnalysisConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::CutoffOutOfRange(_))),
                "cutoff {cutoff}"
            );
        }
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut cfg = AnalysisConfig::default();
        assert_eq!(cfg.validate(), Ok(()));

        cfg.demand_threshold = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange { field: "demand_threshold", .. })
        ));

        cfg = AnalysisConfig {
            stratification_cutoff: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::CutoffOutOfRange(_))));

        cfg = AnalysisConfig {
            cascade_depth: 0,
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCascadeDepth));

        cfg = AnalysisConfig::default();
        cfg.segments.premium_keywords.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoPremiumKeywords));
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let cfg = AnalysisConfig {
            demand_threshold: f64::NAN,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
