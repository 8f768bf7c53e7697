//! Evaluation observers.
//!
//! The library has no logging dependency. Callers that want per-node
//! diagnostics (tracing, evaluation counts in tests) plug an [`Observer`]
//! into [`Node::evaluate_observed`](crate::Node::evaluate_observed).

use crate::Status;

/// The four node variants, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Action,
    Selector,
    Sequence,
    Decorator,
}

/// Receives a callback for every node the evaluator actually walks.
///
/// Nodes pruned by short-circuiting or closed guards produce no callbacks.
pub trait Observer {
    /// Called before a node is evaluated.
    fn enter(&mut self, _kind: NodeKind, _label: &str) {}

    /// Called with the outcome of an action or decorator guard.
    fn guard(&mut self, _label: &str, _passed: bool) {}

    /// Called after a node produced its status.
    fn exit(&mut self, _kind: NodeKind, _label: &str, _status: Status) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that records visited node labels in order.
///
/// Handy in tests asserting which branches a tick touched.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    pub visited: Vec<String>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a node with `label` was entered.
    pub fn count(&self, label: &str) -> usize {
        self.visited.iter().filter(|l| l.as_str() == label).count()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.count(label) > 0
    }
}

impl Observer for VisitLog {
    fn enter(&mut self, _kind: NodeKind, label: &str) {
        self.visited.push(label.to_owned());
    }
}
