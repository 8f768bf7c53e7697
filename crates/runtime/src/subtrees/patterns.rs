//! Common rotation rules.
//!
//! Each pattern is one priority entry: an ability-readiness check plus
//! the rule's own condition, followed by a commit on the right target.
//! Group patterns with `behavior_tree::builder::selector` (priority order)
//! or gate a whole group with [`aoe_gate`] / [`execute_phase`].
//!
//! # Naming Convention
//!
//! Patterns are named after what they keep doing (`maintain_effect`,
//! `spread_effect`); the ability they press is always an argument.

use behavior_tree::builder::{gate, selector};
use behavior_tree::{Effect, Guard, Label, Node};
use combat_core::{AbilityId, EffectId, ResourceKind};

use crate::context::TickContext;
use crate::nodes::actions;
use crate::nodes::conditions::{self, all};

fn rule(
    label: impl Into<Label>,
    guard: Guard<TickContext>,
    effect: Effect<TickContext>,
) -> Node<TickContext> {
    Node::Action {
        label: label.into(),
        guard,
        effect,
    }
}

// ============================================================================
// Casting state
// ============================================================================

/// Reports `Running` while a cast or channel is in flight, so nothing
/// below it is attempted this tick. Place it first.
pub fn hold_while_casting() -> Node<TickContext> {
    rule(
        "hold-while-casting",
        conditions::is_casting(),
        actions::hold_while_casting(),
    )
}

// ============================================================================
// Effect upkeep
// ============================================================================

/// Keep the actor's `effect` up on the primary target by casting `ability`
/// whenever it is missing or inside its refresh window.
pub fn maintain_effect(ability: AbilityId, effect: EffectId) -> Node<TickContext> {
    rule(
        format!("maintain[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::refreshable_on_target(effect),
        ]),
        actions::cast_on_primary(ability),
    )
}

/// Keep `effect` up on the actor by casting `ability` on self.
pub fn maintain_buff(ability: AbilityId, effect: EffectId) -> Node<TickContext> {
    rule(
        format!("buff[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::refreshable_on_self(effect),
        ]),
        actions::cast_on_self(ability),
    )
}

/// Apply `effect` to the hostile within `radius` that lacks it longest,
/// as long as that candidate's instance is refreshable.
pub fn spread_effect(ability: AbilityId, effect: EffectId, radius: f32) -> Node<TickContext> {
    rule(
        format!("spread[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::spread_candidate_refreshable(effect, radius),
        ]),
        actions::cast_on_spread_target(ability, effect, radius),
    )
}

// ============================================================================
// Spenders and cooldowns
// ============================================================================

/// Cast `ability` on the primary target once `kind` holds at least `amount`.
pub fn spend_at(ability: AbilityId, kind: ResourceKind, amount: f32) -> Node<TickContext> {
    rule(
        format!("spend[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::has_target(),
            conditions::resource_at_least(kind, amount),
        ]),
        actions::cast_on_primary(ability),
    )
}

/// Cast `ability` on the primary target when it is ready and `when` holds.
pub fn cooldown_when(ability: AbilityId, when: Guard<TickContext>) -> Node<TickContext> {
    rule(
        format!("cooldown[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::has_target(),
            when,
        ]),
        actions::cast_on_primary(ability),
    )
}

/// Heal the most injured ally within `radius` once it drops below `below`.
pub fn heal_lowest_ally(ability: AbilityId, radius: f32, below: f32) -> Node<TickContext> {
    rule(
        format!("heal[{}]", ability.0),
        all(vec![
            conditions::ability_ready(ability),
            conditions::ally_health_below(radius, below),
        ]),
        actions::cast_on_lowest_ally(ability, radius),
    )
}

/// Single-target filler with no condition of its own. Place it last.
pub fn filler(ability: AbilityId) -> Node<TickContext> {
    rule(
        format!("filler[{}]", ability.0),
        all(vec![conditions::ability_ready(ability), conditions::has_target()]),
        actions::cast_on_primary(ability),
    )
}

// ============================================================================
// Gates
// ============================================================================

/// Evaluates `children` (priority order) only when at least `min_hostiles`
/// engaged hostiles are within `radius`. Otherwise the whole block is
/// skipped without walking it and fails, so single-target rules below it
/// run.
pub fn aoe_gate(
    min_hostiles: usize,
    radius: f32,
    children: Vec<Node<TickContext>>,
) -> Node<TickContext> {
    gate(
        format!("aoe[{min_hostiles}]"),
        conditions::hostiles_around(radius, min_hostiles),
        selector("aoe-priority", children),
    )
}

/// Evaluates `children` only while the primary target is below `threshold`
/// health.
pub fn execute_phase(threshold: f32, children: Vec<Node<TickContext>>) -> Node<TickContext> {
    gate(
        "execute",
        conditions::target_health_below(threshold),
        selector("execute-priority", children),
    )
}

#[cfg(test)]
mod tests {
    use behavior_tree::{Status, VisitLog};
    use combat_core::{
        AbilityState, ActorState, EffectSet, EngineConfig, Entity, EntityId, ResourcePool,
        TimedEffect, WorldSnapshot,
    };

    use super::*;
    use crate::sink::RecordingSink;

    const ME: EntityId = EntityId(1);
    const DOT: EffectId = EffectId(20);
    const CORRUPT: AbilityId = AbilityId(1);
    const NOVA: AbilityId = AbilityId(2);
    const BOLT: AbilityId = AbilityId(3);

    fn actor() -> ActorState {
        let mut actor = ActorState::new(ME);
        for id in [CORRUPT, NOVA, BOLT] {
            actor.abilities.insert(AbilityState::ready(id));
        }
        actor
    }

    fn run(tree: &Node<TickContext>, entities: Vec<Entity>) -> (Status, RecordingSink, VisitLog) {
        let sink = RecordingSink::new();
        let mut ctx = TickContext::new(Box::new(sink.clone()), EngineConfig::default());
        ctx.begin(WorldSnapshot::new(actor(), entities));
        let mut log = VisitLog::new();
        let status = tree.evaluate_observed(&mut ctx, &mut log);
        (status, sink, log)
    }

    #[test]
    fn maintain_skips_fresh_effect() {
        let tree = selector("st", vec![maintain_effect(CORRUPT, DOT), filler(BOLT)]);

        let fresh = EffectSet::new().with(TimedEffect::new(DOT, 12.0, 14.0).with_source(ME));
        let target = Entity::hostile(EntityId(2), 5.0).with_effects(fresh);
        let (status, sink, _) = run(&tree, vec![target]);
        assert_eq!(status, Status::Success);
        assert_eq!(sink.executed()[0].ability, BOLT);

        let (_, sink, _) = run(&tree, vec![Entity::hostile(EntityId(2), 5.0)]);
        assert_eq!(sink.executed()[0].ability, CORRUPT);
    }

    #[test]
    fn aoe_gate_prunes_block_below_threshold() {
        let tree = selector(
            "root",
            vec![aoe_gate(3, 8.0, vec![filler(NOVA)]), filler(BOLT)],
        );

        let two = vec![Entity::hostile(EntityId(2), 3.0), Entity::hostile(EntityId(3), 4.0)];
        let (_, sink, log) = run(&tree, two);
        assert!(!log.contains("aoe-priority"));
        assert_eq!(sink.executed()[0].ability, BOLT);

        let three = vec![
            Entity::hostile(EntityId(2), 3.0),
            Entity::hostile(EntityId(3), 4.0),
            Entity::hostile(EntityId(4), 5.0),
        ];
        let (_, sink, _) = run(&tree, three);
        assert_eq!(sink.executed()[0].ability, NOVA);
    }

    #[test]
    fn spread_skips_when_every_candidate_is_fresh() {
        let tree = spread_effect(CORRUPT, DOT, 10.0);
        let fresh = || EffectSet::new().with(TimedEffect::new(DOT, 12.0, 14.0).with_source(ME));
        let entities = vec![
            Entity::hostile(EntityId(2), 3.0).with_effects(fresh()),
            Entity::hostile(EntityId(3), 4.0).with_effects(fresh()),
        ];
        let (status, sink, _) = run(&tree, entities);
        assert_eq!(status, Status::Failure);
        assert!(sink.history().is_empty());
    }

    #[test]
    fn spender_waits_for_resource() {
        let tree = spend_at(NOVA, ResourceKind::ComboPoints, 5.0);
        let sink = RecordingSink::new();
        let mut ctx = TickContext::new(Box::new(sink.clone()), EngineConfig::default());

        let mut low = actor();
        low.resources.insert(ResourceKind::ComboPoints, ResourcePool::new(3.0, 5.0));
        ctx.begin(WorldSnapshot::new(low, vec![Entity::hostile(EntityId(2), 3.0)]));
        assert_eq!(tree.evaluate(&mut ctx), Status::Failure);

        let mut full = actor();
        full.resources.insert(ResourceKind::ComboPoints, ResourcePool::new(5.0, 5.0));
        ctx.begin(WorldSnapshot::new(full, vec![Entity::hostile(EntityId(2), 3.0)]));
        assert_eq!(tree.evaluate(&mut ctx), Status::Success);
        assert_eq!(sink.executed().len(), 1);
    }

    #[test]
    fn buff_is_cast_on_self_only_when_refreshable() {
        const SHIELD: EffectId = EffectId(30);
        let tree = maintain_buff(NOVA, SHIELD);

        let (_, sink, _) = run(&tree, vec![]);
        assert_eq!(sink.executed()[0].target, Some(ME));

        let sink = RecordingSink::new();
        let mut ctx = TickContext::new(Box::new(sink.clone()), EngineConfig::default());
        let mut shielded = actor();
        shielded.effects.push(TimedEffect::new(SHIELD, 25.0, 30.0));
        ctx.begin(WorldSnapshot::new(shielded, vec![]));
        assert_eq!(tree.evaluate(&mut ctx), Status::Failure);
        assert!(sink.history().is_empty());
    }

    #[test]
    fn cooldown_needs_a_target_and_its_condition() {
        let tree = cooldown_when(NOVA, conditions::hostiles_around(10.0, 2));
        let (status, _, _) = run(&tree, vec![]);
        assert_eq!(status, Status::Failure);

        let (status, _, _) = run(&tree, vec![Entity::hostile(EntityId(2), 3.0)]);
        assert_eq!(status, Status::Failure);

        let pack = vec![Entity::hostile(EntityId(2), 3.0), Entity::hostile(EntityId(3), 4.0)];
        let (status, sink, _) = run(&tree, pack);
        assert_eq!(status, Status::Success);
        assert_eq!(sink.executed()[0].target, Some(EntityId(2)));
    }

    #[test]
    fn execute_phase_opens_below_threshold() {
        let tree = selector("root", vec![execute_phase(0.2, vec![filler(NOVA)]), filler(BOLT)]);

        let (_, sink, log) = run(&tree, vec![Entity::hostile(EntityId(2), 3.0).with_health(0.5)]);
        assert!(!log.contains("execute-priority"));
        assert_eq!(sink.executed()[0].ability, BOLT);

        let (_, sink, _) = run(&tree, vec![Entity::hostile(EntityId(2), 3.0).with_health(0.15)]);
        assert_eq!(sink.executed()[0].ability, NOVA);
    }

    #[test]
    fn heals_only_injured_ally() {
        let tree = heal_lowest_ally(NOVA, 30.0, 0.5);
        let ally = |health| Entity::friendly(EntityId(5), 10.0).with_health(health);
        let (status, _, _) = run(&tree, vec![ally(0.8)]);
        assert_eq!(status, Status::Failure);

        let (status, sink, _) = run(&tree, vec![ally(0.3)]);
        assert_eq!(status, Status::Success);
        assert_eq!(sink.executed()[0].target, Some(EntityId(5)));
    }
}
