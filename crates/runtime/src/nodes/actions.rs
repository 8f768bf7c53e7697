//! Effect constructors for rotation trees.
//!
//! Effects are the committing half of an action. Each one resolves its
//! target, then hands the attempt to [`TickContext::commit`]. A missing
//! target is a plain `Rejected`; the sink is never called with a target the
//! resolver could not produce.

use behavior_tree::{Effect, Outcome};
use combat_core::{AbilityId, EffectId};

use crate::context::TickContext;

/// Casts `ability` on the resolved primary target.
pub fn cast_on_primary(ability: AbilityId) -> Effect<TickContext> {
    Box::new(move |ctx: &mut TickContext| match ctx.primary_target_id() {
        Some(target) => ctx.commit(ability, Some(target)),
        None => {
            tracing::debug!(%ability, "no primary target");
            Outcome::Rejected
        }
    })
}

/// Casts `ability` on the actor itself.
pub fn cast_on_self(ability: AbilityId) -> Effect<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let me = ctx.actor().id;
        ctx.commit(ability, Some(me))
    })
}

/// Casts `ability` without a target (ground effects, self-centred novas).
pub fn cast_untargeted(ability: AbilityId) -> Effect<TickContext> {
    Box::new(move |ctx: &mut TickContext| ctx.commit(ability, None))
}

/// Casts `ability` on the hostile within `radius` that has gone longest
/// without the actor's `effect`, publishing the candidate for overlays.
pub fn cast_on_spread_target(
    ability: AbilityId,
    effect: EffectId,
    radius: f32,
) -> Effect<TickContext> {
    Box::new(move |ctx: &mut TickContext| {
        let Some(target) = ctx.spread_target(effect, radius) else {
            return Outcome::Rejected;
        };
        ctx.mark_auxiliary(format!("spread:{}", effect.0), vec![target]);
        ctx.commit(ability, Some(target))
    })
}

/// Casts `ability` on the most injured ally within `radius`.
pub fn cast_on_lowest_ally(ability: AbilityId, radius: f32) -> Effect<TickContext> {
    Box::new(move |ctx: &mut TickContext| match ctx.lowest_health_ally(radius) {
        Some(ally) => ctx.commit(ability, Some(ally)),
        None => Outcome::Rejected,
    })
}

/// Holds the tick while a cast or channel is in flight.
pub fn hold_while_casting() -> Effect<TickContext> {
    Box::new(|ctx: &mut TickContext| {
        if ctx.actor().is_casting() {
            Outcome::InProgress
        } else {
            Outcome::Rejected
        }
    })
}
