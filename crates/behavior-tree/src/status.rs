//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// # Tick Semantics
///
/// The tree is re-derived from the top every tick, so `Running` never means
/// "resume me next tick". It means "stop walking this tick, nothing further
/// should be attempted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For guards: the gate was open and the child succeeded.
    /// For actions: the commit was confirmed by the execution layer.
    Success,

    /// The behavior failed.
    ///
    /// For guards: the condition was not met (or its data was missing).
    /// For actions: the guard rejected the attempt, or the commit was refused.
    Failure,

    /// The behavior is occupying the actor (e.g. a channelled cast).
    ///
    /// Enclosing composites stop evaluating and propagate this upward.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }
}

/// What an action's effect reports after talking to the execution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The attempt happened.
    Executed,
    /// The attempt was refused (stale snapshot, race on resources, ...).
    Rejected,
    /// The actor is busy with a multi-tick action; hold this tick.
    InProgress,
}

impl Outcome {
    /// Maps the outcome onto the node status algebra.
    #[inline]
    pub fn status(self) -> Status {
        match self {
            Outcome::Executed => Status::Success,
            Outcome::Rejected => Status::Failure,
            Outcome::InProgress => Status::Running,
        }
    }
}

impl From<bool> for Outcome {
    #[inline]
    fn from(executed: bool) -> Self {
        if executed {
            Outcome::Executed
        } else {
            Outcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_onto_status() {
        assert_eq!(Outcome::Executed.status(), Status::Success);
        assert_eq!(Outcome::Rejected.status(), Status::Failure);
        assert_eq!(Outcome::InProgress.status(), Status::Running);
    }

    #[test]
    fn sink_boolean_converts_to_outcome() {
        assert_eq!(Outcome::from(true), Outcome::Executed);
        assert_eq!(Outcome::from(false), Outcome::Rejected);
    }
}
