//! Composite evaluation.
//!
//! Composite nodes control the execution flow of multiple children:
//! [`Node::Selector`](crate::Node::Selector) (OR logic) and
//! [`Node::Sequence`](crate::Node::Sequence) (AND logic). Both short-circuit,
//! so children after the deciding one are never walked.

use crate::observer::Observer;
use crate::{Node, Status};

/// Evaluates children left-to-right until one does not fail.
///
/// # Semantics
///
/// - `Failure` moves on to the next child
/// - `Success` or `Running` is returned immediately
/// - If every child fails (or there are none), returns `Failure`
pub(crate) fn select<C>(children: &[Node<C>], ctx: &mut C, observer: &mut dyn Observer) -> Status {
    for child in children {
        match child.evaluate_observed(ctx, observer) {
            Status::Failure => continue, // Try next alternative
            decided => return decided,   // Short-circuit
        }
    }
    Status::Failure
}

/// Evaluates children left-to-right until one does not succeed.
///
/// # Semantics
///
/// - `Success` moves on to the next child
/// - `Failure` or `Running` is returned immediately
/// - If every child succeeds (or there are none), returns `Success`
pub(crate) fn sequence<C>(
    children: &[Node<C>],
    ctx: &mut C,
    observer: &mut dyn Observer,
) -> Status {
    for child in children {
        match child.evaluate_observed(ctx, observer) {
            Status::Success => continue,
            decided => return decided,
        }
    }
    Status::Success
}

#[cfg(test)]
mod tests {
    use crate::builder::{action, hold, selector, sequence};
    use crate::observer::VisitLog;
    use crate::{Node, Outcome, Status};

    struct TestContext {
        value: i32,
    }

    fn increment(label: &'static str) -> Node<TestContext> {
        action(
            label,
            |_: &mut TestContext| true,
            |ctx: &mut TestContext| {
                ctx.value += 1;
                Outcome::Executed
            },
        )
    }

    fn fail_always(label: &'static str) -> Node<TestContext> {
        action(
            label,
            |_: &mut TestContext| true,
            |_: &mut TestContext| Outcome::Rejected,
        )
    }

    #[test]
    fn sequence_all_success() {
        let seq = sequence("seq", vec![increment("a"), increment("b")]);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(seq.evaluate(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let seq = sequence(
            "seq",
            vec![increment("a"), fail_always("fail"), increment("never")],
        );

        let mut ctx = TestContext { value: 0 };
        let mut log = VisitLog::new();
        assert_eq!(seq.evaluate_observed(&mut ctx, &mut log), Status::Failure);
        assert_eq!(ctx.value, 1);
        assert!(!log.contains("never"));
    }

    #[test]
    fn sequence_stops_on_running() {
        let seq = sequence("seq", vec![hold("busy"), increment("never")]);

        let mut ctx = TestContext { value: 0 };
        let mut log = VisitLog::new();
        assert_eq!(seq.evaluate_observed(&mut ctx, &mut log), Status::Running);
        assert_eq!(ctx.value, 0);
        assert_eq!(log.count("never"), 0);
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let sel = selector(
            "sel",
            vec![fail_always("fail"), increment("first"), increment("never")],
        );

        let mut ctx = TestContext { value: 0 };
        let mut log = VisitLog::new();
        assert_eq!(sel.evaluate_observed(&mut ctx, &mut log), Status::Success);
        assert_eq!(ctx.value, 1);
        assert_eq!(log.visited, vec!["sel", "fail", "first"]);
    }

    #[test]
    fn selector_stops_on_running() {
        let sel = selector("sel", vec![hold("busy"), increment("never")]);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(sel.evaluate(&mut ctx), Status::Running);
        assert_eq!(ctx.value, 0);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let sel = selector("sel", vec![fail_always("a"), fail_always("b")]);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(sel.evaluate(&mut ctx), Status::Failure);
    }

    #[test]
    fn empty_composites_are_vacuous() {
        let mut ctx = TestContext { value: 0 };
        assert_eq!(selector("sel", vec![]).evaluate(&mut ctx), Status::Failure);
        assert_eq!(sequence("seq", vec![]).evaluate(&mut ctx), Status::Success);
    }
}
