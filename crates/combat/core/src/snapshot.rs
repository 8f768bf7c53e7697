//! The immutable, tick-scoped view of the world.
//!
//! A [`WorldSnapshot`] is produced once per tick by a [`SnapshotProvider`]
//! and is read-only for the whole evaluation. Nothing in the engine mutates
//! it; the next tick simply receives a new one.

use std::collections::BTreeSet;

use crate::ability::AbilityBook;
use crate::effect::EffectSet;
use crate::entity::Entity;
use crate::error::SnapshotError;
use crate::ids::{AbilityId, EntityId, Position};
use crate::resource::ResourcePools;

/// An in-flight cast or channel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastState {
    pub ability: AbilityId,
    pub remaining: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub channeled: bool,
}

/// The acting unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default = "full_health"))]
    pub health_fraction: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: ResourcePools,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: EffectSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: AbilityBook,
    /// The target the player (or host) explicitly designated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub designated_target: Option<EntityId>,
    /// Global cooldown left, in seconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gcd_remaining: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub casting: Option<CastState>,
}

#[cfg(feature = "serde")]
fn full_health() -> f32 {
    1.0
}

impl ActorState {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            position: Position::ORIGIN,
            health_fraction: 1.0,
            resources: ResourcePools::new(),
            effects: EffectSet::new(),
            abilities: AbilityBook::new(),
            designated_target: None,
            gcd_remaining: 0.0,
            casting: None,
        }
    }

    /// True while a cast or channel is in flight.
    pub fn is_casting(&self) -> bool {
        self.casting.as_ref().is_some_and(|c| c.remaining > 0.0)
    }
}

impl Default for ActorState {
    fn default() -> Self {
        Self::new(EntityId::default())
    }
}

/// Read-only facts for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    /// Simulation time in seconds, for diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: f64,
    pub actor: ActorState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entities: Vec<Entity>,
}

impl WorldSnapshot {
    pub fn new(actor: ActorState, entities: Vec<Entity>) -> Self {
        Self {
            time: 0.0,
            actor,
            entities,
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Live hostile entities.
    pub fn hostiles(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.is_alive() && e.is_hostile())
    }

    /// Live friendly entities (the actor is not listed here).
    pub fn friendlies(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.is_alive() && e.is_friendly())
    }

    /// Checks the data-model invariants.
    ///
    /// A snapshot that fails validation is not evaluated; the tick degrades
    /// to "no action taken".
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let actor = &self.actor;
        if !(0.0..=1.0).contains(&actor.health_fraction) {
            return Err(SnapshotError::InvalidActorField {
                field: "health_fraction",
                value: actor.health_fraction,
            });
        }
        let cast_remaining = actor.casting.as_ref().map(|cast| cast.remaining);
        for (field, value) in [
            ("gcd_remaining", Some(actor.gcd_remaining)),
            ("cast_remaining", cast_remaining),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite() || *v < 0.0) {
                return Err(SnapshotError::InvalidActorField { field, value });
            }
        }
        validate_effects(actor.id, &actor.effects)?;

        for (kind, pool) in self.actor.resources.iter() {
            if !pool.is_consistent() {
                return Err(SnapshotError::ResourceOutOfBounds {
                    kind,
                    current: pool.current,
                    max: pool.max,
                });
            }
        }

        for ability in self.actor.abilities.iter() {
            let charges = ability.current_charges;
            if !charges.is_finite() || charges < 0.0 || charges > ability.max_charges as f32 {
                return Err(SnapshotError::ChargesOutOfBounds {
                    ability: ability.id,
                    current: charges,
                    max: ability.max_charges,
                });
            }
            for (field, value) in [
                ("cooldown_remaining", ability.cooldown_remaining),
                ("recharge_time", ability.recharge_time),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SnapshotError::InvalidAbilityTiming {
                        ability: ability.id,
                        field,
                        value,
                    });
                }
            }
        }

        let mut seen = BTreeSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.id) {
                return Err(SnapshotError::DuplicateEntity(entity.id));
            }
            if !entity.distance.is_finite() || entity.distance < 0.0 {
                return Err(SnapshotError::InvalidEntityField {
                    entity: entity.id,
                    field: "distance",
                    value: entity.distance,
                });
            }
            if !(0.0..=1.0).contains(&entity.health_fraction) {
                return Err(SnapshotError::InvalidEntityField {
                    entity: entity.id,
                    field: "health_fraction",
                    value: entity.health_fraction,
                });
            }
            // infinite is a valid estimate (the unit never dies); `None` is unknown
            if let Some(ttd) = entity.time_to_death.filter(|t| t.is_nan() || *t < 0.0) {
                return Err(SnapshotError::InvalidEntityField {
                    entity: entity.id,
                    field: "time_to_death",
                    value: ttd,
                });
            }
            validate_effects(entity.id, &entity.effects)?;
        }

        Ok(())
    }
}

/// Timed effects need a finite, non-negative remaining time. Untimed effects
/// never consult it.
fn validate_effects(owner: EntityId, effects: &EffectSet) -> Result<(), SnapshotError> {
    match effects
        .iter()
        .filter(|e| !e.is_untimed())
        .find(|e| !e.remaining.is_finite() || e.remaining < 0.0)
    {
        Some(bad) => Err(SnapshotError::InvalidEffectTiming {
            owner,
            effect: bad.id,
            value: bad.remaining,
        }),
        None => Ok(()),
    }
}

/// Pull interface to the live simulation.
///
/// Each call must return a snapshot that is internally consistent for the
/// duration of one tick (no torn reads).
pub trait SnapshotProvider {
    fn capture(&mut self) -> Result<WorldSnapshot, SnapshotError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityState;
    use crate::resource::{ResourceKind, ResourcePool};

    fn actor() -> ActorState {
        let mut actor = ActorState::new(EntityId(1));
        actor
            .resources
            .insert(ResourceKind::Energy, ResourcePool::new(60.0, 100.0));
        actor
            .abilities
            .insert(AbilityState::with_charges(AbilityId(5), 1.4, 2, 12.0));
        actor
    }

    #[test]
    fn consistent_snapshot_validates() {
        let snapshot = WorldSnapshot::new(actor(), vec![Entity::hostile(EntityId(9), 5.0)]);
        assert_eq!(snapshot.validate(), Ok(()));
    }

    #[test]
    fn overfull_pool_is_rejected() {
        let mut actor = actor();
        actor
            .resources
            .insert(ResourceKind::Energy, ResourcePool::new(140.0, 100.0));
        let snapshot = WorldSnapshot::new(actor, vec![]);

        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::ResourceOutOfBounds {
                kind: ResourceKind::Energy,
                ..
            })
        ));
    }

    #[test]
    fn charges_above_max_are_rejected() {
        let mut actor = actor();
        actor
            .abilities
            .insert(AbilityState::with_charges(AbilityId(5), 2.5, 2, 12.0));
        let snapshot = WorldSnapshot::new(actor, vec![]);

        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::ChargesOutOfBounds { .. })
        ));
    }

    #[test]
    fn duplicate_and_nan_entities_are_rejected() {
        let dup = WorldSnapshot::new(
            actor(),
            vec![
                Entity::hostile(EntityId(9), 5.0),
                Entity::hostile(EntityId(9), 6.0),
            ],
        );
        assert_eq!(dup.validate(), Err(SnapshotError::DuplicateEntity(EntityId(9))));

        let nan = WorldSnapshot::new(actor(), vec![Entity::hostile(EntityId(9), f32::NAN)]);
        assert!(matches!(
            nan.validate(),
            Err(SnapshotError::InvalidEntityField { field: "distance", .. })
        ));
    }

    #[test]
    fn corrupt_effect_timing_is_rejected() {
        use crate::effect::TimedEffect;
        use crate::ids::EffectId;

        let negative = Entity::hostile(EntityId(9), 5.0)
            .with_effects(EffectSet::new().with(TimedEffect::new(EffectId(1), -3.0, 12.0)));
        assert_eq!(
            WorldSnapshot::new(actor(), vec![negative]).validate(),
            Err(SnapshotError::InvalidEffectTiming {
                owner: EntityId(9),
                effect: EffectId(1),
                value: -3.0,
            })
        );

        let mut buffed = actor();
        buffed.effects.push(TimedEffect::new(EffectId(2), f32::NAN, 12.0));
        assert!(matches!(
            WorldSnapshot::new(buffed, vec![]).validate(),
            Err(SnapshotError::InvalidEffectTiming {
                owner: EntityId(1),
                effect: EffectId(2),
                ..
            })
        ));

        // untimed auras carry no meaningful remaining time
        let aura = Entity::friendly(EntityId(4), 2.0)
            .with_effects(EffectSet::new().with(TimedEffect::new(EffectId(3), f32::NAN, 0.0)));
        assert_eq!(WorldSnapshot::new(actor(), vec![aura]).validate(), Ok(()));
    }

    #[test]
    fn bad_time_to_death_is_rejected() {
        for ttd in [-1.0, f32::NAN] {
            let entity = Entity::hostile(EntityId(9), 5.0).with_time_to_death(ttd);
            assert!(matches!(
                WorldSnapshot::new(actor(), vec![entity]).validate(),
                Err(SnapshotError::InvalidEntityField { field: "time_to_death", .. })
            ));
        }

        let immortal = Entity::hostile(EntityId(9), 5.0).with_time_to_death(f32::INFINITY);
        assert_eq!(WorldSnapshot::new(actor(), vec![immortal]).validate(), Ok(()));
    }

    #[test]
    fn bad_actor_fields_are_rejected() {
        let mut wounded = actor();
        wounded.health_fraction = 1.5;
        assert!(matches!(
            WorldSnapshot::new(wounded, vec![]).validate(),
            Err(SnapshotError::InvalidActorField { field: "health_fraction", .. })
        ));

        let mut gcd = actor();
        gcd.gcd_remaining = -0.5;
        assert!(matches!(
            WorldSnapshot::new(gcd, vec![]).validate(),
            Err(SnapshotError::InvalidActorField { field: "gcd_remaining", .. })
        ));

        let mut casting = actor();
        casting.casting = Some(CastState {
            ability: AbilityId(5),
            remaining: f32::NAN,
            channeled: false,
        });
        assert!(matches!(
            WorldSnapshot::new(casting, vec![]).validate(),
            Err(SnapshotError::InvalidActorField { field: "cast_remaining", .. })
        ));
    }

    #[test]
    fn hostiles_skip_dead_units() {
        use crate::entity::EntityFlags;

        let snapshot = WorldSnapshot::new(
            actor(),
            vec![
                Entity::hostile(EntityId(2), 5.0),
                Entity::hostile(EntityId(3), 5.0).without(EntityFlags::ALIVE),
                Entity::friendly(EntityId(4), 5.0),
            ],
        );

        let ids: Vec<_> = snapshot.hostiles().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(2)]);
        assert_eq!(snapshot.friendlies().count(), 1);
    }
}
