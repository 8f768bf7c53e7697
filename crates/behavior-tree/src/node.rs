//! The node algebra.
//!
//! A tree is a plain [`Node`] value: four variants matched exhaustively by
//! the evaluator. Trees are built once and shared read-only across ticks;
//! no variant holds mutable state, so every evaluation re-derives its
//! decision from the context alone.

use std::borrow::Cow;

use crate::observer::{NodeKind, NoopObserver, Observer};
use crate::{Outcome, Status, composite, decorator};

/// A pure predicate gating an action or a decorated subtree.
///
/// Guards take the context mutably only so they can populate per-tick query
/// caches; they must not change anything the rest of the tree can observe.
pub type Guard<C> = Box<dyn Fn(&mut C) -> bool + Send + Sync>;

/// The committing half of an action.
pub type Effect<C> = Box<dyn Fn(&mut C) -> Outcome + Send + Sync>;

/// Diagnostic label carried by every node.
pub type Label = Cow<'static, str>;

/// A behavior tree node, generic over the evaluation context `C`.
pub enum Node<C> {
    /// Two-phase leaf: check `guard`, then run `effect` against the sink.
    Action {
        label: Label,
        guard: Guard<C>,
        effect: Effect<C>,
    },

    /// First non-`Failure` child wins (logical OR, short-circuited).
    Selector { label: Label, children: Vec<Node<C>> },

    /// First non-`Success` child wins (logical AND, short-circuited).
    Sequence { label: Label, children: Vec<Node<C>> },

    /// Gates a whole subtree behind a guard, with an optional fallback.
    Decorator {
        label: Label,
        guard: Guard<C>,
        child: Box<Node<C>>,
        else_branch: Option<Box<Node<C>>>,
    },
}

impl<C> Node<C> {
    /// Evaluates this node against the context.
    ///
    /// Depth-first, left-to-right, and total: the walk visits each node at
    /// most once, so it terminates in time bounded by [`Node::node_count`].
    pub fn evaluate(&self, ctx: &mut C) -> Status {
        self.evaluate_observed(ctx, &mut NoopObserver)
    }

    /// Evaluates this node, reporting every visited node to `observer`.
    pub fn evaluate_observed(&self, ctx: &mut C, observer: &mut dyn Observer) -> Status {
        let kind = self.kind();
        observer.enter(kind, self.label());

        let status = match self {
            Node::Action {
                label,
                guard,
                effect,
            } => {
                let open = guard(ctx);
                observer.guard(label, open);
                if open {
                    effect(ctx).status()
                } else {
                    Status::Failure
                }
            }
            Node::Selector { children, .. } => composite::select(children, ctx, observer),
            Node::Sequence { children, .. } => composite::sequence(children, ctx, observer),
            Node::Decorator {
                label,
                guard,
                child,
                else_branch,
            } => decorator::gate(label, guard, child, else_branch.as_deref(), ctx, observer),
        };

        observer.exit(kind, self.label(), status);
        status
    }

    /// Returns the variant of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Action { .. } => NodeKind::Action,
            Node::Selector { .. } => NodeKind::Selector,
            Node::Sequence { .. } => NodeKind::Sequence,
            Node::Decorator { .. } => NodeKind::Decorator,
        }
    }

    /// Returns the diagnostic label of this node.
    pub fn label(&self) -> &str {
        match self {
            Node::Action { label, .. }
            | Node::Selector { label, .. }
            | Node::Sequence { label, .. }
            | Node::Decorator { label, .. } => label.as_ref(),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Action { .. } => 1,
            Node::Selector { children, .. } | Node::Sequence { children, .. } => {
                1 + children.iter().map(Node::node_count).sum::<usize>()
            }
            Node::Decorator {
                child, else_branch, ..
            } => 1 + child.node_count() + else_branch.as_ref().map_or(0, |e| e.node_count()),
        }
    }

    /// Length of the longest root-to-leaf path (a lone leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Node::Action { .. } => 1,
            Node::Selector { children, .. } | Node::Sequence { children, .. } => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
            Node::Decorator {
                child, else_branch, ..
            } => 1 + child.depth().max(else_branch.as_ref().map_or(0, |e| e.depth())),
        }
    }
}

impl<C> std::fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Action { label, .. } => f.debug_struct("Action").field("label", label).finish(),
            Node::Selector { label, children } => f
                .debug_struct("Selector")
                .field("label", label)
                .field("children", children)
                .finish(),
            Node::Sequence { label, children } => f
                .debug_struct("Sequence")
                .field("label", label)
                .field("children", children)
                .finish(),
            Node::Decorator {
                label,
                child,
                else_branch,
                ..
            } => f
                .debug_struct("Decorator")
                .field("label", label)
                .field("child", child)
                .field("else_branch", else_branch)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{action, gate_or, selector, sequence, succeed};

    #[derive(Default)]
    struct Ctx {
        commits: Vec<&'static str>,
    }

    fn commit(name: &'static str, executed: bool) -> Node<Ctx> {
        action(
            name,
            |_: &mut Ctx| true,
            move |ctx: &mut Ctx| {
                ctx.commits.push(name);
                Outcome::from(executed)
            },
        )
    }

    #[test]
    fn action_with_closed_guard_never_commits() {
        let node = action(
            "closed",
            |_: &mut Ctx| false,
            |ctx: &mut Ctx| {
                ctx.commits.push("closed");
                Outcome::Executed
            },
        );

        let mut ctx = Ctx::default();
        assert_eq!(node.evaluate(&mut ctx), Status::Failure);
        assert!(ctx.commits.is_empty());
    }

    #[test]
    fn rejected_commit_is_failure() {
        let mut ctx = Ctx::default();
        assert_eq!(commit("x", false).evaluate(&mut ctx), Status::Failure);
        assert_eq!(ctx.commits, vec!["x"]);
    }

    #[test]
    fn counts_nodes_and_depth() {
        let tree: Node<Ctx> = selector(
            "root",
            vec![
                commit("a", true),
                sequence("seq", vec![commit("b", true), commit("c", true)]),
                gate_or("gate", |_: &mut Ctx| true, commit("d", true), succeed()),
            ],
        );

        assert_eq!(tree.node_count(), 8);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.kind(), NodeKind::Selector);
        assert_eq!(tree.label(), "root");
    }
}
