//! The per-tick blackboard handed to every guard and effect.
//!
//! [`TickContext`] owns the tick's [`WorldSnapshot`], the [`QueryCache`], the
//! commit sink and the engine configuration. It is long-lived but reset at
//! the start of every tick by [`TickContext::begin`], so no decision, cached
//! answer or commit record can leak from one tick into the next.
//!
//! # Queries
//!
//! Derived queries (`hostiles_within`, `spread_target`, ...) go through the
//! cache and are computed at most once per tick regardless of how many
//! branches ask. Target-dependent queries answer `None` when there is no
//! primary target; guards built on them read that as a closed gate.

use behavior_tree::Outcome;
use combat_core::{
    AbilityId, AbilityState, ActorState, EffectId, EngineConfig, Entity, EntityId, ResourceKind,
    ResourcePool, WorldSnapshot, effect_remaining_key, resolve_by_min, resolve_primary,
};

use crate::cache::{CacheStats, QueryCache, QueryKey, QueryValue, Radius};
use crate::overlay::AuxiliarySet;
use crate::sink::{AbilityAttempt, CommitSink};

pub struct TickContext {
    snapshot: WorldSnapshot,
    cache: QueryCache,
    sink: Box<dyn CommitSink>,
    config: EngineConfig,

    /// Attempts that reached the sink this tick.
    attempts: Vec<AbilityAttempt>,

    /// The attempt that executed this tick, if any.
    committed: Option<AbilityAttempt>,

    auxiliary: Vec<AuxiliarySet>,
}

impl TickContext {
    pub fn new(sink: Box<dyn CommitSink>, config: EngineConfig) -> Self {
        Self {
            snapshot: WorldSnapshot::default(),
            cache: QueryCache::new(),
            sink,
            config,
            attempts: Vec::new(),
            committed: None,
            auxiliary: Vec::new(),
        }
    }

    /// Starts a new tick against `snapshot`. Returns the new epoch.
    pub fn begin(&mut self, snapshot: WorldSnapshot) -> u64 {
        self.snapshot = snapshot;
        self.attempts.clear();
        self.committed = None;
        self.auxiliary.clear();
        self.cache.advance_epoch()
    }

    // ========================================================================
    // Snapshot access
    // ========================================================================

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    pub fn actor(&self) -> &ActorState {
        &self.snapshot.actor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.cache.epoch()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn ability(&self, id: AbilityId) -> Option<&AbilityState> {
        self.snapshot.actor.abilities.get(id)
    }

    pub fn resource(&self, kind: ResourceKind) -> Option<&ResourcePool> {
        self.snapshot.actor.resources.get(kind)
    }

    // ========================================================================
    // Cached queries
    // ========================================================================

    /// The resolved primary target, `None` when no candidate is valid.
    pub fn primary_target_id(&mut self) -> Option<EntityId> {
        let snapshot = &self.snapshot;
        let policy = &self.config.targeting;
        self.cache
            .get_or_compute(QueryKey::PrimaryTarget, || {
                let designated = snapshot.actor.designated_target;
                QueryValue::Entity(
                    resolve_primary(&snapshot.entities, designated, policy).map(|e| e.id),
                )
            })
            .as_entity()
    }

    pub fn primary_target(&mut self) -> Option<&Entity> {
        let id = self.primary_target_id()?;
        self.snapshot.entity(id)
    }

    /// Engaged hostiles within `radius` of the actor.
    pub fn hostiles_within(&mut self, radius: f32) -> usize {
        let radius = Radius::new(radius);
        let snapshot = &self.snapshot;
        self.cache
            .get_or_compute(QueryKey::HostilesWithin(radius), || {
                QueryValue::Count(
                    engaged(snapshot)
                        .filter(|e| radius.contains(e.distance))
                        .count(),
                )
            })
            .as_count()
            .unwrap_or(0)
    }

    /// Engaged hostiles within `radius` of `center` (the center included).
    pub fn hostiles_near(&mut self, center: EntityId, radius: f32) -> Option<usize> {
        let origin = self.snapshot.entity(center)?.position;
        let radius = Radius::new(radius);
        let snapshot = &self.snapshot;
        self.cache
            .get_or_compute(QueryKey::HostilesNear { center, radius }, || {
                QueryValue::Count(
                    engaged(snapshot)
                        .filter(|e| radius.contains(e.position.distance_to(origin)))
                        .count(),
                )
            })
            .as_count()
    }

    pub fn hostiles_near_target(&mut self, radius: f32) -> Option<usize> {
        let target = self.primary_target_id()?;
        self.hostiles_near(target, radius)
    }

    /// Engaged hostiles within `radius` lacking the actor's instance of
    /// `effect`, ordered by id.
    pub fn missing_effect_within(&mut self, effect: EffectId, radius: f32) -> Vec<EntityId> {
        let radius = Radius::new(radius);
        let snapshot = &self.snapshot;
        let me = snapshot.actor.id;
        let value = self
            .cache
            .get_or_compute(QueryKey::MissingEffect { effect, radius }, || {
                let mut ids: Vec<_> = engaged(snapshot)
                    .filter(|e| radius.contains(e.distance))
                    .filter(|e| e.effects.get_from(effect, me).is_none())
                    .map(|e| e.id)
                    .collect();
                ids.sort_unstable();
                QueryValue::Entities(ids)
            });
        value.as_entities().map(<[EntityId]>::to_vec).unwrap_or_default()
    }

    /// Visible engaged hostile within `radius` whose instance of `effect`
    /// (applied by the actor) has the least time left; candidates without it
    /// come first.
    pub fn spread_target(&mut self, effect: EffectId, radius: f32) -> Option<EntityId> {
        let radius = Radius::new(radius);
        let snapshot = &self.snapshot;
        let require_visible = self.config.targeting.require_visible;
        self.cache
            .get_or_compute(QueryKey::SpreadTarget { effect, radius }, || {
                let candidates = engaged(snapshot)
                    .filter(|e| radius.contains(e.distance))
                    .filter(|e| !require_visible || e.is_visible());
                let key = effect_remaining_key(effect, Some(snapshot.actor.id));
                QueryValue::Entity(resolve_by_min(candidates, key).map(|e| e.id))
            })
            .as_entity()
    }

    /// Most injured live, visible ally within `radius`.
    pub fn lowest_health_ally(&mut self, radius: f32) -> Option<EntityId> {
        let radius = Radius::new(radius);
        let snapshot = &self.snapshot;
        self.cache
            .get_or_compute(QueryKey::LowestHealthAlly(radius), || {
                let allies = snapshot
                    .friendlies()
                    .filter(|e| e.is_visible() && radius.contains(e.distance));
                QueryValue::Entity(resolve_by_min(allies, |e| e.health_fraction).map(|e| e.id))
            })
            .as_entity()
    }

    // ========================================================================
    // Diagnostics export
    // ========================================================================

    /// Publishes an auxiliary target set for overlays. A later mark with the
    /// same label replaces the earlier one.
    pub fn mark_auxiliary(&mut self, label: impl Into<String>, entities: Vec<EntityId>) {
        let label = label.into();
        match self.auxiliary.iter_mut().find(|set| set.label == label) {
            Some(set) => set.entities = entities,
            None => self.auxiliary.push(AuxiliarySet { label, entities }),
        }
    }

    pub fn auxiliary(&self) -> &[AuxiliarySet] {
        &self.auxiliary
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Submits an attempt to the sink.
    ///
    /// At most one attempt may execute per tick: once something executed,
    /// further commits are refused without reaching the sink. A target that
    /// is neither the actor nor in the snapshot is refused the same way.
    pub fn commit(&mut self, ability: AbilityId, target: Option<EntityId>) -> Outcome {
        if let Some(done) = self.committed {
            tracing::warn!(
                %ability,
                committed = %done.ability,
                epoch = self.epoch(),
                "refusing second commit in one tick"
            );
            return Outcome::Rejected;
        }

        if let Some(id) = target
            && id != self.snapshot.actor.id
            && self.snapshot.entity(id).is_none()
        {
            tracing::debug!(%ability, target = %id, "commit target not in snapshot");
            return Outcome::Rejected;
        }

        let executed = self.sink.try_commit(ability, target);
        let attempt = AbilityAttempt {
            ability,
            target,
            executed,
        };
        self.attempts.push(attempt);

        if executed {
            tracing::debug!(%ability, target = ?target, "committed");
            self.committed = Some(attempt);
        } else {
            tracing::debug!(%ability, target = ?target, "sink rejected attempt");
        }
        Outcome::from(executed)
    }

    pub fn committed(&self) -> Option<AbilityAttempt> {
        self.committed
    }

    pub fn attempts(&self) -> &[AbilityAttempt] {
        &self.attempts
    }
}

impl std::fmt::Debug for TickContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickContext")
            .field("epoch", &self.epoch())
            .field("actor", &self.snapshot.actor.id)
            .field("committed", &self.committed)
            .field("attempts", &self.attempts.len())
            .finish_non_exhaustive()
    }
}

fn engaged(snapshot: &WorldSnapshot) -> impl Iterator<Item = &Entity> {
    snapshot.hostiles().filter(|e| e.in_combat())
}
