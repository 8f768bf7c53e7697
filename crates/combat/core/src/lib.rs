//! Tick-scoped combat data and the pure logic that reads it.
//!
//! `combat-core` defines the world snapshot handed to the decision engine
//! each tick, the timing/resource predicates guards are built from, and the
//! deterministic target resolver. Nothing here mutates a snapshot; the
//! runtime crate layers caching and commit handling on top.
pub mod ability;
pub mod config;
pub mod effect;
pub mod entity;
pub mod error;
pub mod ids;
pub mod predicates;
pub mod resource;
pub mod snapshot;
pub mod targeting;

pub use ability::{AbilityBook, AbilityState};
pub use config::EngineConfig;
pub use effect::{EffectSet, TimedEffect};
pub use entity::{Entity, EntityFlags};
pub use error::SnapshotError;
pub use ids::{AbilityId, EffectId, EntityId, Position};
pub use predicates::{RefreshPolicy, Tristate};
pub use resource::{ResourceKind, ResourcePool, ResourcePools};
pub use snapshot::{ActorState, CastState, SnapshotProvider, WorldSnapshot};
pub use targeting::{
    TargetPolicy, effect_remaining_key, is_valid_designation, resolve_by_max, resolve_by_min,
    resolve_primary,
};
