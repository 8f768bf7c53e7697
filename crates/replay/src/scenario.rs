//! Scripted scenario files.
//!
//! A scenario is a RON document holding a rotation, optional runtime
//! configuration, and the snapshots to feed it, one per tick. Each tick may
//! also list abilities the execution layer should reject, to reproduce
//! "guard passed, commit failed" situations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use combat_core::{AbilityId, SnapshotError, SnapshotProvider, WorldSnapshot};
use runtime::{RecordingSink, RotationSpec, RuntimeConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Inline rotation; may be replaced with `--rotation`.
    #[serde(default)]
    pub rotation: Option<RotationSpec>,
    #[serde(default)]
    pub config: RuntimeConfig,
    pub ticks: Vec<ScriptedTick>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedTick {
    pub snapshot: WorldSnapshot,
    /// Abilities the sink refuses during this tick.
    #[serde(default)]
    pub reject: Vec<AbilityId>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid scenario: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Self = ron::from_str(text).context("Failed to parse scenario RON")?;
        if scenario.ticks.is_empty() {
            bail!("Scenario has no ticks");
        }
        scenario.config.validate()?;
        if let Some(rotation) = &scenario.rotation {
            rotation.validate()?;
        }
        Ok(scenario)
    }
}

/// Feeds scripted ticks to the engine, arming the sink's rejections as each
/// snapshot is captured.
pub struct ScriptedProvider {
    ticks: std::vec::IntoIter<ScriptedTick>,
    sink: RecordingSink,
}

impl ScriptedProvider {
    pub fn new(ticks: Vec<ScriptedTick>, sink: RecordingSink) -> Self {
        Self {
            ticks: ticks.into_iter(),
            sink,
        }
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl SnapshotProvider for ScriptedProvider {
    fn capture(&mut self) -> Result<WorldSnapshot, SnapshotError> {
        let tick = self
            .ticks
            .next()
            .ok_or_else(|| SnapshotError::Unavailable("scenario exhausted".into()))?;
        self.sink.set_rejected(tick.reject);
        Ok(tick.snapshot)
    }
}
