//! The tick driver.
//!
//! [`RotationEngine`] owns a compiled tree and the long-lived
//! [`TickContext`]. Each call to [`RotationEngine::tick`] takes one fresh
//! snapshot, walks the tree once from the root, and returns a
//! [`TickReport`] describing what happened. The engine never sleeps or
//! schedules: the host decides when to call it.
//!
//! ```text
//!   provider ──snapshot──▶ validate ──▶ begin(epoch+1) ──▶ walk tree
//!                              │                             │
//!                              ▼                             ▼
//!                      degraded report               sink / overlay
//! ```

use behavior_tree::{Node, NodeKind, Observer, Status};
use combat_core::{EngineConfig, EntityId, SnapshotError, SnapshotProvider, WorldSnapshot};

use crate::cache::CacheStats;
use crate::config::RuntimeConfig;
use crate::context::TickContext;
use crate::overlay::{AuxiliarySet, TargetOverlay, TargetReport, TracingOverlay};
use crate::sink::{AbilityAttempt, CommitSink};

/// Outcome of a single tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub epoch: u64,
    /// Simulation time carried by the snapshot.
    pub time: f64,
    /// Root status. `Failure` means nothing was done this tick.
    pub status: Status,
    /// The attempt that executed, if any.
    pub committed: Option<AbilityAttempt>,
    /// Every attempt that reached the sink, in order.
    pub attempts: Vec<AbilityAttempt>,
    pub primary_target: Option<EntityId>,
    pub nodes_visited: usize,
    pub cache: CacheStats,
    pub auxiliary: Vec<AuxiliarySet>,
    /// Why the tree was not walked, when the snapshot was unusable.
    pub fault: Option<SnapshotError>,
}

impl TickReport {
    fn degraded(epoch: u64, time: f64, fault: SnapshotError) -> Self {
        Self {
            epoch,
            time,
            status: Status::Failure,
            committed: None,
            attempts: Vec::new(),
            primary_target: None,
            nodes_visited: 0,
            cache: CacheStats::default(),
            auxiliary: Vec::new(),
            fault: Some(fault),
        }
    }

    /// True when an ability executed this tick.
    pub fn acted(&self) -> bool {
        self.committed.is_some()
    }

    pub fn is_degraded(&self) -> bool {
        self.fault.is_some()
    }
}

/// Counts visited nodes and traces every guard decision.
#[derive(Debug, Default)]
struct TickTrace {
    visited: usize,
}

impl Observer for TickTrace {
    fn enter(&mut self, _kind: NodeKind, _label: &str) {
        self.visited += 1;
    }

    fn guard(&mut self, label: &str, passed: bool) {
        tracing::trace!(node = label, passed, "guard");
    }

    fn exit(&mut self, kind: NodeKind, label: &str, status: Status) {
        if kind == NodeKind::Action && status != Status::Failure {
            tracing::trace!(node = label, ?status, "action settled");
        }
    }
}

/// Drives a rotation tree one snapshot at a time.
pub struct RotationEngine {
    tree: Node<TickContext>,
    ctx: TickContext,
    overlay: Option<Box<dyn TargetOverlay>>,
    validate_snapshots: bool,
}

impl RotationEngine {
    pub fn new(tree: Node<TickContext>, sink: Box<dyn CommitSink>, config: EngineConfig) -> Self {
        Self {
            tree,
            ctx: TickContext::new(sink, config),
            overlay: None,
            validate_snapshots: RuntimeConfig::DEFAULT_VALIDATE_SNAPSHOTS,
        }
    }

    /// Builds an engine from loaded configuration. A [`TracingOverlay`] is
    /// attached when `publish_targets` is set.
    pub fn from_config(
        tree: Node<TickContext>,
        sink: Box<dyn CommitSink>,
        config: &RuntimeConfig,
    ) -> Self {
        let mut engine = Self::new(tree, sink, config.engine);
        engine.validate_snapshots = config.validate_snapshots;
        if config.publish_targets {
            engine.overlay = Some(Box::new(TracingOverlay));
        }
        engine
    }

    /// Attaches an overlay that receives every tick's target choices.
    pub fn with_overlay(mut self, overlay: impl TargetOverlay + 'static) -> Self {
        self.overlay = Some(Box::new(overlay));
        self
    }

    pub fn tree(&self) -> &Node<TickContext> {
        &self.tree
    }

    pub fn context(&self) -> &TickContext {
        &self.ctx
    }

    /// Runs one tick against `snapshot`.
    pub fn tick(&mut self, snapshot: WorldSnapshot) -> TickReport {
        let time = snapshot.time;
        let fault = if self.validate_snapshots {
            snapshot.validate().err()
        } else {
            None
        };

        // The epoch advances even for a rejected snapshot so nothing cached
        // from the previous tick survives it.
        let epoch = self.ctx.begin(snapshot);
        if let Some(fault) = fault {
            tracing::warn!(epoch, error = %fault, "snapshot rejected, skipping tick");
            return TickReport::degraded(epoch, time, fault);
        }

        let mut trace = TickTrace::default();
        let status = self.tree.evaluate_observed(&mut self.ctx, &mut trace);
        let cache = self.ctx.cache_stats();
        let primary_target = self.ctx.primary_target_id();

        let report = TickReport {
            epoch,
            time,
            status,
            committed: self.ctx.committed(),
            attempts: self.ctx.attempts().to_vec(),
            primary_target,
            nodes_visited: trace.visited,
            cache,
            auxiliary: self.ctx.auxiliary().to_vec(),
            fault: None,
        };

        tracing::debug!(
            epoch,
            ?status,
            committed = ?report.committed.map(|a| a.ability),
            nodes = report.nodes_visited,
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            "tick complete"
        );

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.publish(&TargetReport {
                epoch,
                primary: report.primary_target,
                auxiliary: report.auxiliary.clone(),
            });
        }

        report
    }

    /// Pulls a snapshot from `provider` and runs one tick.
    ///
    /// A provider failure degrades the tick: the cache epoch still advances
    /// and nothing is committed.
    pub fn tick_from(&mut self, provider: &mut dyn SnapshotProvider) -> TickReport {
        match provider.capture() {
            Ok(snapshot) => self.tick(snapshot),
            Err(fault) => {
                let epoch = self.ctx.begin(WorldSnapshot::default());
                tracing::warn!(epoch, error = %fault, "snapshot provider failed");
                TickReport::degraded(epoch, 0.0, fault)
            }
        }
    }
}

impl std::fmt::Debug for RotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationEngine")
            .field("root", &self.tree.label())
            .field("nodes", &self.tree.node_count())
            .field("ctx", &self.ctx)
            .field("overlay", &self.overlay.is_some())
            .field("validate_snapshots", &self.validate_snapshots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use behavior_tree::builder::selector;
    use combat_core::{AbilityId, AbilityState, ActorState, Entity, ResourceKind, ResourcePool};

    use super::*;
    use crate::sink::RecordingSink;
    use crate::subtrees::patterns::filler;

    const ME: EntityId = EntityId(1);
    const BOLT: AbilityId = AbilityId(3);

    fn snapshot() -> WorldSnapshot {
        let mut actor = ActorState::new(ME);
        actor.abilities.insert(AbilityState::ready(BOLT));
        WorldSnapshot::new(actor, vec![Entity::hostile(EntityId(2), 5.0)])
    }

    fn engine(sink: &RecordingSink) -> RotationEngine {
        RotationEngine::new(
            selector("root", vec![filler(BOLT)]),
            Box::new(sink.clone()),
            EngineConfig::default(),
        )
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<TargetReport>>>);

    impl TargetOverlay for Captured {
        fn publish(&mut self, report: &TargetReport) {
            self.0.lock().unwrap().push(report.clone());
        }
    }

    struct Offline;

    impl SnapshotProvider for Offline {
        fn capture(&mut self) -> Result<WorldSnapshot, SnapshotError> {
            Err(SnapshotError::Unavailable("client closed".into()))
        }
    }

    #[test]
    fn tick_commits_and_reports() {
        let sink = RecordingSink::new();
        let mut engine = engine(&sink);

        let report = engine.tick(snapshot());
        assert_eq!(report.epoch, 1);
        assert_eq!(report.status, Status::Success);
        assert!(report.acted());
        assert_eq!(report.primary_target, Some(EntityId(2)));
        assert_eq!(report.nodes_visited, 2);
        assert_eq!(sink.executed().len(), 1);
    }

    #[test]
    fn invalid_snapshot_degrades_without_walking() {
        let sink = RecordingSink::new();
        let mut engine = engine(&sink);

        let mut bad = snapshot();
        bad.actor
            .resources
            .insert(ResourceKind::Mana, ResourcePool::new(120.0, 100.0));
        let report = engine.tick(bad);

        assert!(report.is_degraded());
        assert_eq!(report.status, Status::Failure);
        assert_eq!(report.nodes_visited, 0);
        assert!(sink.history().is_empty());

        let report = engine.tick(snapshot());
        assert_eq!(report.epoch, 2);
        assert!(report.acted());
    }

    #[test]
    fn provider_failure_degrades_tick() {
        let sink = RecordingSink::new();
        let mut engine = engine(&sink);

        let report = engine.tick_from(&mut Offline);
        assert!(matches!(report.fault, Some(SnapshotError::Unavailable(_))));
        assert!(!report.acted());
        assert!(sink.history().is_empty());
    }

    #[test]
    fn overlay_receives_primary_target() {
        let sink = RecordingSink::new();
        let captured = Captured::default();
        let mut engine = engine(&sink).with_overlay(captured.clone());

        engine.tick(snapshot());
        let reports = captured.0.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].primary, Some(EntityId(2)));
    }

    #[test]
    fn from_config_respects_validation_switch() {
        let sink = RecordingSink::new();
        let config = RuntimeConfig {
            validate_snapshots: false,
            ..RuntimeConfig::default()
        };
        let tree = selector("root", vec![filler(BOLT)]);
        let mut engine = RotationEngine::from_config(tree, Box::new(sink), &config);

        let mut odd = snapshot();
        odd.actor
            .resources
            .insert(ResourceKind::Mana, ResourcePool::new(120.0, 100.0));
        assert!(!engine.tick(odd).is_degraded());
    }
}
