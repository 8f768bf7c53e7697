//! Timed effects (buffs and debuffs) as observed in one snapshot.
//!
//! Effects are owned by the snapshot and never mutated by the decision tree;
//! external systems advance them between ticks.

use crate::ids::{EffectId, EntityId};

/// A single buff/debuff instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEffect {
    pub id: EffectId,
    /// Seconds until the effect falls off.
    pub remaining: f32,
    /// Full duration when freshly applied. Zero means "not time-gated".
    pub base_duration: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_stacks"))]
    pub stacks: u32,
    /// Who applied it, for "applied-by-me" checks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<EntityId>,
}

#[cfg(feature = "serde")]
fn default_stacks() -> u32 {
    1
}

impl TimedEffect {
    /// Creates a single-stack effect with no recorded source.
    pub fn new(id: EffectId, remaining: f32, base_duration: f32) -> Self {
        Self {
            id,
            remaining,
            base_duration,
            stacks: 1,
            source: None,
        }
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// True if the effect has no meaningful duration (permanent auras, or a
    /// provider that did not report one).
    pub fn is_untimed(&self) -> bool {
        !(self.base_duration.is_finite() && self.base_duration > 0.0)
    }
}

/// All effects present on one unit.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectSet {
    effects: Vec<TimedEffect>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, effect: TimedEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn push(&mut self, effect: TimedEffect) {
        self.effects.push(effect);
    }

    /// The instance of `id` with the most time left, from any source.
    ///
    /// When several sources applied the same effect, the one with the most
    /// time left is returned so "is it up" answers are not pessimistic.
    pub fn get(&self, id: EffectId) -> Option<&TimedEffect> {
        self.effects
            .iter()
            .filter(|e| e.id == id)
            .max_by(|a, b| a.remaining.total_cmp(&b.remaining))
    }

    /// Instance of `id` applied by `source`.
    pub fn get_from(&self, id: EffectId, source: EntityId) -> Option<&TimedEffect> {
        self.effects
            .iter()
            .find(|e| e.id == id && e.source == Some(source))
    }

    pub fn has(&self, id: EffectId) -> bool {
        self.get(id).is_some()
    }

    /// Stack count of `id`, zero if absent.
    pub fn stacks(&self, id: EffectId) -> u32 {
        self.get(id).map_or(0, |e| e.stacks)
    }

    /// Remaining seconds of `id`, zero if absent.
    pub fn remaining(&self, id: EffectId) -> f32 {
        self.get(id).map_or(0.0, |e| e.remaining)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl FromIterator<TimedEffect> for EffectSet {
    fn from_iter<T: IntoIterator<Item = TimedEffect>>(iter: T) -> Self {
        Self {
            effects: iter.into_iter().collect(),
        }
    }
}
