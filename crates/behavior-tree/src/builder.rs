//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing out struct variants with boxed closures,
//! you can use shorter functions like `selector("root", vec![...])`.

use crate::{Label, Node, Outcome};

/// Creates an action node from a guard and an effect.
#[inline]
pub fn action<C: 'static>(
    label: impl Into<Label>,
    guard: impl Fn(&mut C) -> bool + Send + Sync + 'static,
    effect: impl Fn(&mut C) -> Outcome + Send + Sync + 'static,
) -> Node<C> {
    Node::Action {
        label: label.into(),
        guard: Box::new(guard),
        effect: Box::new(effect),
    }
}

/// Creates a selector node.
#[inline]
pub fn selector<C: 'static>(label: impl Into<Label>, children: Vec<Node<C>>) -> Node<C> {
    Node::Selector {
        label: label.into(),
        children,
    }
}

/// Creates a sequence node.
#[inline]
pub fn sequence<C: 'static>(label: impl Into<Label>, children: Vec<Node<C>>) -> Node<C> {
    Node::Sequence {
        label: label.into(),
        children,
    }
}

/// Creates a decorator without an else branch (closed gate = `Failure`).
#[inline]
pub fn gate<C: 'static>(
    label: impl Into<Label>,
    guard: impl Fn(&mut C) -> bool + Send + Sync + 'static,
    child: Node<C>,
) -> Node<C> {
    Node::Decorator {
        label: label.into(),
        guard: Box::new(guard),
        child: Box::new(child),
        else_branch: None,
    }
}

/// Creates a decorator that evaluates `otherwise` when the gate is closed.
#[inline]
pub fn gate_or<C: 'static>(
    label: impl Into<Label>,
    guard: impl Fn(&mut C) -> bool + Send + Sync + 'static,
    child: Node<C>,
    otherwise: Node<C>,
) -> Node<C> {
    Node::Decorator {
        label: label.into(),
        guard: Box::new(guard),
        child: Box::new(child),
        else_branch: Some(Box::new(otherwise)),
    }
}

/// Neutral `Success` sentinel. Commits nothing.
#[inline]
pub fn succeed<C: 'static>() -> Node<C> {
    action("succeed", |_: &mut C| true, |_: &mut C| Outcome::Executed)
}

/// Neutral `Failure` sentinel.
#[inline]
pub fn fail<C: 'static>() -> Node<C> {
    action("fail", |_: &mut C| false, |_: &mut C| Outcome::Rejected)
}

/// Leaf that reports `Running`, halting the walk for this tick.
#[inline]
pub fn hold<C: 'static>(label: impl Into<Label>) -> Node<C> {
    action(label, |_: &mut C| true, |_: &mut C| Outcome::InProgress)
}

/// Adapts a guard whose data may be missing.
///
/// `None` (e.g. no target, unknown entity) reads as a closed gate, so a
/// malformed branch fails locally and its siblings are still tried.
#[inline]
pub fn guard_opt<C: 'static>(
    check: impl Fn(&mut C) -> Option<bool> + Send + Sync + 'static,
) -> impl Fn(&mut C) -> bool + Send + Sync + 'static {
    move |ctx| check(ctx).unwrap_or(false)
}
