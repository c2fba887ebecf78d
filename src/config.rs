//! Metric configuration.
//!
//! The defaults are the canonical normalization set. A YAML file may
//! override any subset:
//!
//! ```yaml
//! distance:
//!   scale_factor: 250
//!   threshold: 500
//! tla:
//!   max_normalized: 1.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PeriochartError;
use crate::metrics::NormalizeConfig;

/// Parameters for every derived series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsConfig {
    /// Normalization of bone and CEJ distances.
    pub distance: NormalizeConfig,

    /// Normalization of tooth long-axis positions.
    pub tla: NormalizeConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            distance: NormalizeConfig::DISTANCE,
            tla: NormalizeConfig::TLA,
        }
    }
}

/// On-disk form: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    distance: Option<NormalizeOverrides>,
    #[serde(default)]
    tla: Option<NormalizeOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizeOverrides {
    scale_factor: Option<f64>,
    threshold: Option<f64>,
    max_normalized: Option<f64>,
}

impl NormalizeOverrides {
    fn apply(self, base: NormalizeConfig) -> NormalizeConfig {
        NormalizeConfig {
            scale_factor: self.scale_factor.unwrap_or(base.scale_factor),
            threshold: self.threshold.unwrap_or(base.threshold),
            max_normalized: self.max_normalized.unwrap_or(base.max_normalized),
        }
    }
}

impl MetricsConfig {
    /// Loads a configuration file. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// describes an unusable normalization.
    pub fn from_file(path: &Path) -> Result<Self, PeriochartError> {
        let content = fs::read_to_string(path).map_err(PeriochartError::Io)?;
        let config =
            Self::from_yaml_str(&content).map_err(|source| PeriochartError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.check()?;
        log::debug!("loaded metrics config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parses YAML text, filling unspecified keys from the canonical set of
    /// the same section.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let file: Option<ConfigFile> = serde_yaml::from_str(yaml)?;
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Ok(Self {
            distance: file
                .distance
                .map_or(defaults.distance, |o| o.apply(defaults.distance)),
            tla: file.tla.map_or(defaults.tla, |o| o.apply(defaults.tla)),
        })
    }

    /// Verifies both normalizations.
    pub fn check(&self) -> Result<(), PeriochartError> {
        self.distance
            .check()
            .map_err(|msg| PeriochartError::InvalidConfig(format!("distance: {msg}")))?;
        self.tla
            .check()
            .map_err(|msg| PeriochartError::InvalidConfig(format!("tla: {msg}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let config = MetricsConfig::default();
        assert_eq!(config.distance.scale_factor, 150.0);
        assert_eq!(config.distance.threshold, 300.0);
        assert_eq!(config.tla.scale_factor, 250.0);
        assert_eq!(config.tla.threshold, 500.0);
    }

    #[test]
    fn partial_sections_keep_their_own_defaults() {
        let config = MetricsConfig::from_yaml_str("tla:\n  max_normalized: 1.0\n")
            .expect("parse config");
        assert_eq!(config.distance, NormalizeConfig::DISTANCE);
        assert_eq!(config.tla.scale_factor, 250.0);
        assert_eq!(config.tla.threshold, 500.0);
        assert_eq!(config.tla.max_normalized, 1.0);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = MetricsConfig::from_yaml_str("{}").expect("parse config");
        assert_eq!(config, MetricsConfig::default());
        let config = MetricsConfig::from_yaml_str("").expect("parse empty file");
        assert_eq!(config, MetricsConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(MetricsConfig::from_yaml_str("distanse:\n  scale_factor: 1\n").is_err());
    }

    #[test]
    fn from_file_checks_values() {
        let temp = tempfile::tempdir().expect("create temp dir");

        let good = temp.path().join("good.yaml");
        fs::write(&good, "distance:\n  scale_factor: 250\n  threshold: 500\n")
            .expect("write config");
        let config = MetricsConfig::from_file(&good).expect("load config");
        assert_eq!(config.distance.scale_factor, 250.0);
        assert_eq!(config.distance.threshold, 500.0);

        let bad = temp.path().join("bad.yaml");
        fs::write(&bad, "distance:\n  scale_factor: 0\n").expect("write config");
        let err = MetricsConfig::from_file(&bad).unwrap_err();
        assert!(matches!(err, PeriochartError::InvalidConfig(_)));

        let broken = temp.path().join("broken.yaml");
        fs::write(&broken, "distance: [").expect("write config");
        let err = MetricsConfig::from_file(&broken).unwrap_err();
        assert!(matches!(err, PeriochartError::ConfigParse { .. }));
    }
}
