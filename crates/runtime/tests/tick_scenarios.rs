use behavior_tree::builder::{action, gate, gate_or, selector, sequence, succeed};
use behavior_tree::{Node, Status, VisitLog};
use combat_core::{
    AbilityId, AbilityState, ActorState, CastState, EffectId, EffectSet, EngineConfig, Entity,
    EntityId, TimedEffect, WorldSnapshot,
};
use runtime::nodes::conditions::{always, hostiles_around, not};
use runtime::nodes::{cast_on_primary, hold_while_casting};
use runtime::subtrees::patterns::{aoe_gate, filler, maintain_effect};
use runtime::{CacheStats, RecordingSink, RotationEngine, RotationSpec, TickContext};

const ME: EntityId = EntityId(1);
const X: AbilityId = AbilityId(10);
const Y: AbilityId = AbilityId(11);
const DOT: EffectId = EffectId(20);

fn actor() -> ActorState {
    let mut actor = ActorState::new(ME);
    for id in [X, Y] {
        actor.abilities.insert(AbilityState::ready(id));
    }
    actor
}

fn one_hostile() -> WorldSnapshot {
    WorldSnapshot::new(actor(), vec![Entity::hostile(EntityId(2), 5.0)])
}

fn x_then_y(a_holds: bool) -> Node<TickContext> {
    let guard_a = if a_holds { always() } else { not(always()) };
    selector(
        "root",
        vec![
            action("cast-x", guard_a, cast_on_primary(X)),
            action("cast-y", always(), cast_on_primary(Y)),
        ],
    )
}

fn engine(tree: Node<TickContext>, sink: &RecordingSink) -> RotationEngine {
    RotationEngine::new(tree, Box::new(sink.clone()), EngineConfig::default())
}

#[test]
fn closed_guard_falls_through_to_next_alternative() {
    let sink = RecordingSink::new();
    let mut engine = engine(x_then_y(false), &sink);

    let report = engine.tick(one_hostile());
    assert_eq!(report.status, Status::Success);
    assert_eq!(report.committed.map(|a| a.ability), Some(Y));
    // X never reached the sink
    assert_eq!(sink.history().len(), 1);
}

#[test]
fn rejected_commit_falls_through_within_the_same_tick() {
    let sink = RecordingSink::rejecting([X]);
    let mut engine = engine(x_then_y(true), &sink);

    let report = engine.tick(one_hostile());
    assert_eq!(report.status, Status::Success);
    assert_eq!(report.attempts.len(), 2);
    assert_eq!(report.attempts[0].ability, X);
    assert!(!report.attempts[0].executed);
    assert_eq!(report.committed.map(|a| a.ability), Some(Y));
}

#[test]
fn ticks_rederive_without_leaking_state() {
    let sink = RecordingSink::new();
    let tree = selector("st", vec![maintain_effect(X, DOT), filler(Y)]);
    let mut engine = engine(tree, &sink);

    let first = engine.tick(one_hostile());
    assert_eq!(first.committed.map(|a| a.ability), Some(X));

    let dotted = Entity::hostile(EntityId(2), 5.0)
        .with_effects(EffectSet::new().with(TimedEffect::new(DOT, 12.0, 14.0).with_source(ME)));
    let second = engine.tick(WorldSnapshot::new(actor(), vec![dotted]));
    assert_eq!(second.committed.map(|a| a.ability), Some(Y));

    // the earlier report is unaffected by the later tick
    assert_eq!(first.epoch, 1);
    assert_eq!(first.committed.map(|a| a.ability), Some(X));

    // a new designation is honored immediately
    let mut retarget = actor();
    retarget.designated_target = Some(EntityId(3));
    let third = engine.tick(WorldSnapshot::new(
        retarget,
        vec![Entity::hostile(EntityId(2), 5.0), Entity::hostile(EntityId(3), 9.0)],
    ));
    assert_eq!(third.primary_target, Some(EntityId(3)));
    assert_eq!(third.committed.map(|a| a.target), Some(Some(EntityId(3))));
}

#[test]
fn shared_query_is_computed_once_per_tick() {
    let sink = RecordingSink::new();
    let tree = selector(
        "root",
        vec![
            aoe_gate(3, 8.0, vec![filler(X)]),
            action("pair", hostiles_around(8.0, 2), cast_on_primary(Y)),
        ],
    );
    let mut engine = engine(tree, &sink);
    let two = || {
        WorldSnapshot::new(
            actor(),
            vec![Entity::hostile(EntityId(2), 3.0), Entity::hostile(EntityId(3), 4.0)],
        )
    };

    // hostiles-within-8 (miss, then hit) and the primary target (miss)
    let expected = CacheStats { hits: 1, misses: 2 };
    let report = engine.tick(two());
    assert_eq!(report.committed.map(|a| a.ability), Some(Y));
    assert_eq!(report.cache, expected);

    let report = engine.tick(two());
    assert_eq!(report.cache, expected);
}

#[test]
fn equidistant_candidates_resolve_to_lowest_id() {
    let sink = RecordingSink::new();
    let mut engine = engine(x_then_y(true), &sink);
    let snapshot = WorldSnapshot::new(
        actor(),
        vec![Entity::hostile(EntityId(7), 6.0), Entity::hostile(EntityId(4), 6.0)],
    );

    for _ in 0..3 {
        let report = engine.tick(snapshot.clone());
        assert_eq!(report.primary_target, Some(EntityId(4)));
    }
}

#[test]
fn composites_short_circuit() {
    let sink = RecordingSink::new();
    let mut ctx = TickContext::new(Box::new(sink.clone()), EngineConfig::default());
    ctx.begin(one_hostile());

    let tree = selector("sel", vec![filler(X), filler(Y)]);
    let mut log = VisitLog::new();
    assert_eq!(tree.evaluate_observed(&mut ctx, &mut log), Status::Success);
    assert!(log.contains("filler[10]"));
    assert!(!log.contains("filler[11]"));

    ctx.begin(one_hostile());
    let tree = sequence(
        "seq",
        vec![action("closed", not(always()), cast_on_primary(X)), filler(Y)],
    );
    let mut log = VisitLog::new();
    assert_eq!(tree.evaluate_observed(&mut ctx, &mut log), Status::Failure);
    assert!(!log.contains("filler[11]"));
}

#[test]
fn closed_decorator_never_walks_its_child() {
    let sink = RecordingSink::new();
    let mut ctx = TickContext::new(Box::new(sink.clone()), EngineConfig::default());
    ctx.begin(one_hostile());

    let tree = gate("never", not(always()), filler(X));
    let mut log = VisitLog::new();
    assert_eq!(tree.evaluate_observed(&mut ctx, &mut log), Status::Failure);
    assert!(!log.contains("filler[10]"));

    let handled = gate_or("handled", not(always()), filler(X), succeed());
    assert_eq!(handled.evaluate(&mut ctx), Status::Success);
    assert!(sink.history().is_empty());
}

#[test]
fn running_stops_the_walk() {
    let sink = RecordingSink::new();
    let tree = selector(
        "root",
        vec![action("channel", always(), hold_while_casting()), filler(Y)],
    );
    let mut engine = engine(tree, &sink);

    let mut channeling = actor();
    channeling.casting = Some(CastState {
        ability: X,
        remaining: 2.0,
        channeled: true,
    });
    let hostiles = vec![Entity::hostile(EntityId(2), 5.0)];
    let report = engine.tick(WorldSnapshot::new(channeling, hostiles));
    assert_eq!(report.status, Status::Running);
    assert!(!report.acted());

    let report = engine.tick(one_hostile());
    assert_eq!(report.committed.map(|a| a.ability), Some(Y));
}

#[test]
fn rotation_file_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rotation.ron");
    std::fs::write(
        &path,
        r#"(
            name: "demo",
            priorities: [
                (ability: 10, label: Some("dot"), conditions: [Refreshable(effect: 20)]),
                (ability: 11, label: Some("filler")),
            ],
        )"#,
    )
    .unwrap();

    let spec = RotationSpec::load(&path).unwrap();
    let sink = RecordingSink::new();
    let mut engine = engine(spec.build(), &sink);

    assert_eq!(engine.tick(one_hostile()).committed.map(|a| a.ability), Some(X));
    sink.set_rejected([X]);
    assert_eq!(engine.tick(one_hostile()).committed.map(|a| a.ability), Some(Y));
    assert_eq!(sink.history().len(), 3);
}
