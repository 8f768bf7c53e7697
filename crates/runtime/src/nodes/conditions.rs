//! Guard constructors for rotation trees.
//!
//! Each function returns a boxed, pure predicate over [`TickContext`].
//! Guards never commit anything and never fail loudly: missing data (no
//! target, unknown ability, absent pool) makes the guard return `false`, so
//! one malformed branch cannot stop its siblings from being tried.

use behavior_tree::Guard;
use combat_core::predicates::{
    self, Tristate, can_cast_now, charges_available_by, is_refreshable, time_to_expiry_exceeds,
};
use combat_core::{AbilityId, EffectId, ResourceKind};

use crate::context::TickContext;

// ============================================================================
// Combinators
// ============================================================================

/// All guards pass (evaluated in order, short-circuited).
pub fn all(guards: Vec<Guard<TickContext>>) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| guards.iter().all(|g| g(ctx)))
}

/// Any guard passes (evaluated in order, short-circuited).
pub fn any(guards: Vec<Guard<TickContext>>) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| guards.iter().any(|g| g(ctx)))
}

pub fn not(guard: Guard<TickContext>) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| !guard(ctx))
}

pub fn always() -> Guard<TickContext> {
    Box::new(|_: &mut TickContext| true)
}

// ============================================================================
// Abilities
// ============================================================================

/// A whole charge is banked, no lockout is running and the target is in range.
pub fn ability_ready(ability: AbilityId) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.ability(ability)
            .is_some_and(|a| a.in_range && can_cast_now(a))
    })
}

/// A charge will be available within `horizon` seconds (the configured
/// charge horizon when `None`).
pub fn charges_within(ability: AbilityId, horizon: Option<f32>) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let horizon = horizon.unwrap_or(ctx.config().charge_horizon);
        ctx.ability(ability)
            .is_some_and(|a| charges_available_by(a, horizon))
    })
}

/// Charges will cap within `seconds`; spending now avoids waste.
pub fn charges_capping_within(ability: AbilityId, seconds: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.ability(ability)
            .and_then(predicates::full_recharge_in)
            .is_some_and(|t| t <= seconds)
    })
}

pub fn off_global_cooldown() -> Guard<TickContext> {
    Box::new(|ctx: &mut TickContext| ctx.actor().gcd_remaining <= 0.0)
}

pub fn is_casting() -> Guard<TickContext> {
    Box::new(|ctx: &mut TickContext| ctx.actor().is_casting())
}

// ============================================================================
// Effects
// ============================================================================

/// The actor's instance of `effect` on the primary target is refreshable.
pub fn refreshable_on_target(effect: EffectId) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let me = ctx.actor().id;
        let policy = ctx.config().refresh;
        ctx.primary_target()
            .is_some_and(|t| is_refreshable(t.effects.get_from(effect, me), &policy))
    })
}

/// The best spread candidate within `radius` (see
/// [`TickContext::spread_target`]) holds no fresh instance of the actor's
/// `effect`.
pub fn spread_candidate_refreshable(effect: EffectId, radius: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let Some(id) = ctx.spread_target(effect, radius) else {
            return false;
        };
        let me = ctx.actor().id;
        let policy = ctx.config().refresh;
        ctx.snapshot()
            .entity(id)
            .is_some_and(|e| is_refreshable(e.effects.get_from(effect, me), &policy))
    })
}

/// `effect` on the actor is absent or inside its refresh window.
pub fn refreshable_on_self(effect: EffectId) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        is_refreshable(ctx.actor().effects.get(effect), &ctx.config().refresh)
    })
}

pub fn active_on_self(effect: EffectId) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| ctx.actor().effects.has(effect))
}

pub fn stacks_on_self(effect: EffectId, stacks: u32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        predicates::stacks_at_least(ctx.actor().effects.get(effect), stacks)
    })
}

pub fn stacks_on_target(effect: EffectId, stacks: u32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let me = ctx.actor().id;
        ctx.primary_target()
            .is_some_and(|t| predicates::stacks_at_least(t.effects.get_from(effect, me), stacks))
    })
}

// ============================================================================
// Resources
// ============================================================================

pub fn resource_above(kind: ResourceKind, threshold: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.resource(kind)
            .is_some_and(|p| predicates::resource_above(p, threshold))
    })
}

pub fn resource_below(kind: ResourceKind, threshold: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.resource(kind)
            .is_some_and(|p| predicates::resource_below(p, threshold))
    })
}

pub fn resource_at_least(kind: ResourceKind, amount: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.resource(kind)
            .is_some_and(|p| predicates::resource_at_least(p, amount))
    })
}

/// The pool will overflow within `seconds` of passive regeneration.
pub fn resource_capping_within(kind: ResourceKind, seconds: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.resource(kind)
            .and_then(|p| predicates::time_to_reach(p, p.max))
            .is_some_and(|t| t <= seconds)
    })
}

// ============================================================================
// Targets and surroundings
// ============================================================================

pub fn has_target() -> Guard<TickContext> {
    Box::new(|ctx: &mut TickContext| ctx.primary_target_id().is_some())
}

/// At least `min` engaged hostiles within `radius` of the primary target.
pub fn hostiles_near_target(radius: f32, min: usize) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.hostiles_near_target(radius).is_some_and(|n| n >= min)
    })
}

/// At least `min` engaged hostiles within `radius` of the actor.
pub fn hostiles_around(radius: f32, min: usize) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| ctx.hostiles_within(radius) >= min)
}

pub fn target_health_below(fraction: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        ctx.primary_target()
            .is_some_and(|t| t.health_fraction < fraction)
    })
}

/// The most injured visible ally within `radius` is below `fraction` health.
pub fn ally_health_below(radius: f32, fraction: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let Some(id) = ctx.lowest_health_ally(radius) else {
            return false;
        };
        ctx.snapshot()
            .entity(id)
            .is_some_and(|e| e.health_fraction < fraction)
    })
}

/// Tri-state "will the primary target outlive `seconds`?".
///
/// No target at all is `False` (there is nothing to set up on); a target
/// without an estimate is `Unknown`.
pub fn target_outlives(ctx: &mut TickContext, seconds: f32) -> Tristate {
    match ctx.primary_target() {
        Some(target) => time_to_expiry_exceeds(target, seconds),
        None => Tristate::False,
    }
}

/// The primary target should live longer than `seconds`; an unknown
/// estimate is read through the engine's `assume_unknown_ttd_long` setting.
pub fn target_lives_longer_than(seconds: f32) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let assume = ctx.config().assume_unknown_ttd_long;
        target_outlives(ctx, seconds).or_assume(assume)
    })
}

/// Like [`target_lives_longer_than`], with an explicit reading of "unknown".
pub fn target_lives_longer_than_or(seconds: f32, assume_unknown: bool) -> Guard<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        target_outlives(ctx, seconds).or_assume(assume_unknown)
    })
}
