//! Errors raised while accepting a world snapshot.
//!
//! The decision tree itself never surfaces errors: a guard over missing data
//! simply fails. These errors exist at the boundary, where a provider hands
//! over data that breaks the snapshot invariants or cannot produce one at all.

use crate::ids::{AbilityId, EffectId, EntityId};
use crate::resource::ResourceKind;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("resource pool {kind} out of bounds: current={current}, max={max}")]
    ResourceOutOfBounds {
        kind: ResourceKind,
        current: f32,
        max: f32,
    },

    #[error("{ability} charges out of bounds: current={current}, max={max}")]
    ChargesOutOfBounds {
        ability: AbilityId,
        current: f32,
        max: u32,
    },

    #[error("{ability} has invalid timing: {field}={value}")]
    InvalidAbilityTiming {
        ability: AbilityId,
        field: &'static str,
        value: f32,
    },

    #[error("entity {entity} has invalid {field}: {value}")]
    InvalidEntityField {
        entity: EntityId,
        field: &'static str,
        value: f32,
    },

    #[error("{effect} on entity {owner} has invalid remaining time: {value}")]
    InvalidEffectTiming {
        owner: EntityId,
        effect: EffectId,
        value: f32,
    },

    #[error("actor has invalid {field}: {value}")]
    InvalidActorField { field: &'static str, value: f32 },

    #[error("entity {0} appears more than once")]
    DuplicateEntity(EntityId),

    #[error("snapshot provider unavailable: {0}")]
    Unavailable(String),
}
