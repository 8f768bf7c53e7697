//! Target resolution.
//!
//! Resolvers are pure functions of their candidate set: they never mutate
//! candidates, and the same input always yields the same answer. Ties are
//! broken by the lowest [`EntityId`], so resolution is stable across repeated
//! calls within a tick and across runs with identical input.

use std::cmp::Ordering;

use crate::entity::Entity;
use crate::ids::{EffectId, EntityId};

/// Validity constraints for the primary target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetPolicy {
    /// Maximum distance for any primary target.
    pub engagement_range: f32,
    /// Target must be inside the actor's facing arc.
    pub require_facing: bool,
    /// Target must be visible (line of sight).
    pub require_visible: bool,
    /// Fallback candidates must already be in combat.
    pub require_combat: bool,
}

impl TargetPolicy {
    pub const DEFAULT_ENGAGEMENT_RANGE: f32 = 40.0;

    pub const fn new() -> Self {
        Self {
            engagement_range: Self::DEFAULT_ENGAGEMENT_RANGE,
            require_facing: false,
            require_visible: true,
            require_combat: true,
        }
    }

    pub const fn with_range(mut self, engagement_range: f32) -> Self {
        self.engagement_range = engagement_range;
        self
    }

    pub const fn facing(mut self, require_facing: bool) -> Self {
        self.require_facing = require_facing;
        self
    }

    fn reachable(&self, entity: &Entity) -> bool {
        entity.distance.is_finite()
            && entity.distance <= self.engagement_range
            && (!self.require_visible || entity.is_visible())
            && (!self.require_facing || entity.in_front())
    }
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Can the explicitly designated entity be used as the primary target?
pub fn is_valid_designation(entity: &Entity, policy: &TargetPolicy) -> bool {
    entity.is_alive() && entity.is_hostile() && policy.reachable(entity)
}

fn is_fallback_candidate(entity: &Entity, policy: &TargetPolicy) -> bool {
    is_valid_designation(entity, policy) && (!policy.require_combat || entity.in_combat())
}

/// Picks zero or one primary target.
///
/// The designation wins when it is valid. Otherwise the nearest live,
/// hostile, reachable (and, per policy, in-combat) candidate is chosen.
pub fn resolve_primary<'a>(
    candidates: &'a [Entity],
    designated: Option<EntityId>,
    policy: &TargetPolicy,
) -> Option<&'a Entity> {
    if let Some(id) = designated
        && let Some(entity) = candidates.iter().find(|e| e.id == id)
        && is_valid_designation(entity, policy)
    {
        return Some(entity);
    }

    candidates
        .iter()
        .filter(|e| is_fallback_candidate(e, policy))
        .min_by(|a, b| by_key_then_id(a.distance, a.id, b.distance, b.id))
}

/// Candidate minimizing `key`; ties go to the lowest id, NaN keys are skipped.
pub fn resolve_by_min<'a, I, F>(candidates: I, key: F) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
    F: Fn(&Entity) -> f32,
{
    candidates
        .into_iter()
        .map(|e| (key(e), e))
        .filter(|(k, _)| !k.is_nan())
        .min_by(|(ka, a), (kb, b)| by_key_then_id(*ka, a.id, *kb, b.id))
        .map(|(_, e)| e)
}

/// Candidate maximizing `key`; ties go to the lowest id, NaN keys are skipped.
pub fn resolve_by_max<'a, I, F>(candidates: I, key: F) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
    F: Fn(&Entity) -> f32,
{
    resolve_by_min(candidates, |e| -key(e))
}

/// Key for "spread this effect": remaining duration of `effect`, or negative
/// infinity when the candidate lacks it, so untouched candidates come first.
///
/// With a `source`, only instances applied by that source count.
pub fn effect_remaining_key(
    effect: EffectId,
    source: Option<EntityId>,
) -> impl Fn(&Entity) -> f32 {
    move |entity| {
        let instance = match source {
            Some(source) => entity.effects.get_from(effect, source),
            None => entity.effects.get(effect),
        };
        instance.map_or(f32::NEG_INFINITY, |e| e.remaining)
    }
}

fn by_key_then_id(ka: f32, ia: EntityId, kb: f32, ib: EntityId) -> Ordering {
    ka.total_cmp(&kb).then(ia.cmp(&ib))
}
