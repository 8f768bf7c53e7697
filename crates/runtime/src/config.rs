//! Startup configuration loaded from RON.
//!
//! Configuration is static data: it is read once, validated, and handed to
//! the engine. Nothing in a tick reads files.

use std::path::Path;

use combat_core::EngineConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine tunables plus driver behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Reject snapshots that break the data-model invariants.
    pub validate_snapshots: bool,
    /// Log resolved targets through a `TracingOverlay`.
    pub publish_targets: bool,
}

impl RuntimeConfig {
    pub const DEFAULT_VALIDATE_SNAPSHOTS: bool = true;
    pub const DEFAULT_PUBLISH_TARGETS: bool = false;

    pub fn new() -> Self {
        Self {
            engine: EngineConfig::default(),
            validate_snapshots: Self::DEFAULT_VALIDATE_SNAPSHOTS,
            publish_targets: Self::DEFAULT_PUBLISH_TARGETS,
        }
    }

    /// Rejects values no tick could use sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        if !(0.0..=1.0).contains(&engine.refresh.fraction) {
            return Err(ConfigError::Invalid(format!(
                "refresh fraction {} outside [0, 1]",
                engine.refresh.fraction
            )));
        }
        if engine.targeting.engagement_range.is_nan() || engine.targeting.engagement_range < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "engagement range {} must be non-negative",
                engine.targeting.engagement_range
            )));
        }
        if !engine.charge_horizon.is_finite() || engine.charge_horizon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "charge horizon {} must be finite and non-negative",
                engine.charge_horizon
            )));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads and validates a [`RuntimeConfig`] from a RON file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let config: RuntimeConfig = read_ron(path)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded runtime config");
    Ok(config)
}

/// Parses and validates a [`RuntimeConfig`] from RON text.
pub fn parse_config(text: &str) -> Result<RuntimeConfig, ConfigError> {
    let config: RuntimeConfig = parse_ron(text, "<inline>")?;
    config.validate()?;
    Ok(config)
}

pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ron(&text, &path.display().to_string())
}

pub(crate) fn parse_ron<T: DeserializeOwned>(text: &str, origin: &str) -> Result<T, ConfigError> {
    ron::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("()").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.engine.targeting.engagement_range, 40.0);
    }

    #[test]
    fn loads_partial_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "(engine: (refresh: (fraction: 0.25), assume_unknown_ttd_long: true), publish_targets: true)"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.engine.refresh.fraction, 0.25);
        assert!(config.engine.assume_unknown_ttd_long);
        assert!(config.publish_targets);
        assert!(config.validate_snapshots);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = parse_config("(engine: (refresh: (fraction: 1.5)))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = parse_config("(engine: (charge_horizon: -1.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reports_missing_file_and_bad_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let err = parse_config("(engine: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
