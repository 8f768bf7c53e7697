//! The commit boundary.
//!
//! A guard can only say an ability *should* work; the execution layer
//! decides whether it *did*. [`CommitSink::try_commit`] is authoritative,
//! and a `false` is an ordinary failure the tree recovers from.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use combat_core::{AbilityId, EntityId};

/// Accepts ability attempts from the engine.
pub trait CommitSink: Send {
    /// Attempts `ability` on `target` (or untargeted). Returns whether the
    /// attempt actually executed.
    fn try_commit(&mut self, ability: AbilityId, target: Option<EntityId>) -> bool;
}

/// One attempt as seen by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityAttempt {
    pub ability: AbilityId,
    pub target: Option<EntityId>,
    pub executed: bool,
}

#[derive(Debug, Default)]
struct Recording {
    rejected: BTreeSet<AbilityId>,
    history: Vec<AbilityAttempt>,
}

/// Sink that executes everything except a scripted set of abilities.
///
/// Clones share state: keep one handle to script rejections and inspect the
/// history while another is owned by the engine.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that rejects every ability in `abilities`.
    pub fn rejecting(abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        let sink = Self::new();
        sink.set_rejected(abilities);
        sink
    }

    /// Replaces the rejection set.
    pub fn set_rejected(&self, abilities: impl IntoIterator<Item = AbilityId>) {
        self.lock().rejected = abilities.into_iter().collect();
    }

    /// Every attempt received so far, oldest first.
    pub fn history(&self) -> Vec<AbilityAttempt> {
        self.lock().history.clone()
    }

    /// Attempts that executed, oldest first.
    pub fn executed(&self) -> Vec<AbilityAttempt> {
        self.lock()
            .history
            .iter()
            .filter(|a| a.executed)
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().history.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommitSink for RecordingSink {
    fn try_commit(&mut self, ability: AbilityId, target: Option<EntityId>) -> bool {
        let mut recording = self.lock();
        let executed = !recording.rejected.contains(&ability);
        recording.history.push(AbilityAttempt {
            ability,
            target,
            executed,
        });
        executed
    }
}
