//! One-way export of targeting decisions for visualization.
//!
//! Overlays receive a copy of what the resolver picked each tick. Nothing
//! flows back: the engine never reads from an overlay.

use combat_core::EntityId;

/// A labelled auxiliary target set (e.g. "spread:dot" candidates).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuxiliarySet {
    pub label: String,
    pub entities: Vec<EntityId>,
}

/// What the target resolver chose during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetReport {
    pub epoch: u64,
    pub primary: Option<EntityId>,
    pub auxiliary: Vec<AuxiliarySet>,
}

pub trait TargetOverlay: Send {
    fn publish(&mut self, report: &TargetReport);
}

/// Overlay that writes target reports to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOverlay;

impl TargetOverlay for TracingOverlay {
    fn publish(&mut self, report: &TargetReport) {
        tracing::debug!(
            epoch = report.epoch,
            primary = ?report.primary,
            auxiliary = report.auxiliary.len(),
            "targets resolved"
        );
        for set in &report.auxiliary {
            tracing::trace!(label = %set.label, entities = ?set.entities, "auxiliary targets");
        }
    }
}
