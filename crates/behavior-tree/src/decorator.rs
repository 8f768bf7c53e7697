//! Decorator evaluation.
//!
//! A decorator gates a whole subtree behind a cheap guard. The guard is
//! checked before the child is touched, so a closed gate prunes the subtree
//! entirely rather than merely reinterpreting its result.

use crate::observer::Observer;
use crate::{Guard, Node, Status};

/// Evaluates a decorator.
///
/// # Semantics
///
/// - Guard open: the child's status is returned
/// - Guard closed with an else branch: the else branch's status is returned
/// - Guard closed without an else branch: `Failure`
///
/// A neutral `Success` else branch lets an enclosing selector treat the
/// subtree as "handled, nothing to do" instead of "failed, try next".
pub(crate) fn gate<C>(
    label: &str,
    guard: &Guard<C>,
    child: &Node<C>,
    else_branch: Option<&Node<C>>,
    ctx: &mut C,
    observer: &mut dyn Observer,
) -> Status {
    let open = guard(ctx);
    observer.guard(label, open);

    if open {
        return child.evaluate_observed(ctx, observer);
    }

    match else_branch {
        Some(fallback) => fallback.evaluate_observed(ctx, observer),
        None => Status::Failure,
    }
}
