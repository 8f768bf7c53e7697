//! Candidate targets and allies around the actor.

use bitflags::bitflags;

use crate::effect::EffectSet;
use crate::ids::{EntityId, Position};

bitflags! {
    /// Per-entity facts reported by the snapshot provider.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EntityFlags: u8 {
        const HOSTILE   = 1 << 0;
        const FRIENDLY  = 1 << 1;
        const IN_COMBAT = 1 << 2;
        const VISIBLE   = 1 << 3;
        /// Within the actor's facing arc.
        const IN_FRONT  = 1 << 4;
        const ALIVE     = 1 << 5;
    }
}

/// A unit the actor can see or interact with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    /// Distance from the actor.
    pub distance: f32,
    pub flags: EntityFlags,
    /// Health in `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(default = "full_health"))]
    pub health_fraction: f32,
    /// Estimated seconds until death. An estimate, never a guarantee; `None`
    /// when the provider has no basis for one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_to_death: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: EffectSet,
}

#[cfg(feature = "serde")]
fn full_health() -> f32 {
    1.0
}

impl Entity {
    /// A live, visible, in-combat hostile at `distance`.
    pub fn hostile(id: EntityId, distance: f32) -> Self {
        Self {
            id,
            position: Position::new(distance, 0.0, 0.0),
            distance,
            flags: EntityFlags::HOSTILE
                | EntityFlags::IN_COMBAT
                | EntityFlags::VISIBLE
                | EntityFlags::IN_FRONT
                | EntityFlags::ALIVE,
            health_fraction: 1.0,
            time_to_death: None,
            effects: EffectSet::new(),
        }
    }

    /// A live, visible friendly unit at `distance`.
    pub fn friendly(id: EntityId, distance: f32) -> Self {
        Self {
            id,
            position: Position::new(distance, 0.0, 0.0),
            distance,
            flags: EntityFlags::FRIENDLY | EntityFlags::VISIBLE | EntityFlags::ALIVE,
            health_fraction: 1.0,
            time_to_death: None,
            effects: EffectSet::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn without(mut self, flags: EntityFlags) -> Self {
        self.flags.remove(flags);
        self
    }

    pub fn with_health(mut self, fraction: f32) -> Self {
        self.health_fraction = fraction;
        self
    }

    pub fn with_time_to_death(mut self, seconds: f32) -> Self {
        self.time_to_death = Some(seconds);
        self
    }

    pub fn with_effects(mut self, effects: EffectSet) -> Self {
        self.effects = effects;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.flags.contains(EntityFlags::ALIVE)
    }

    pub fn is_hostile(&self) -> bool {
        self.flags.contains(EntityFlags::HOSTILE)
    }

    pub fn is_friendly(&self) -> bool {
        self.flags.contains(EntityFlags::FRIENDLY)
    }

    pub fn in_combat(&self) -> bool {
        self.flags.contains(EntityFlags::IN_COMBAT)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(EntityFlags::VISIBLE)
    }

    pub fn in_front(&self) -> bool {
        self.flags.contains(EntityFlags::IN_FRONT)
    }
}
