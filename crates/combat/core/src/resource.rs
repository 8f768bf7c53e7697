//! Resource pools (mana, energy, combo points, ...).

use std::collections::BTreeMap;

/// Kinds of resource pools an actor may have.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ResourceKind {
    Health,
    Mana,
    Energy,
    Rage,
    Focus,
    Runic,
    ComboPoints,
    HolyPower,
    SoulShards,
    Maelstrom,
    Fury,
    Insanity,
    AstralPower,
    Chi,
}

/// A bounded pool with an implicit regeneration rate.
///
/// Invariant: `0 <= current <= max` (checked by snapshot validation).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub current: f32,
    pub max: f32,
    /// Units regained per second; zero for pools that only change on events.
    #[cfg_attr(feature = "serde", serde(default))]
    pub regen_per_second: f32,
}

impl ResourcePool {
    pub const fn new(current: f32, max: f32) -> Self {
        Self {
            current,
            max,
            regen_per_second: 0.0,
        }
    }

    pub const fn with_regen(mut self, regen_per_second: f32) -> Self {
        self.regen_per_second = regen_per_second;
        self
    }

    pub fn is_consistent(&self) -> bool {
        self.current.is_finite()
            && self.max.is_finite()
            && self.current >= 0.0
            && self.current <= self.max
    }
}

/// All pools of one actor, keyed by kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourcePools {
    pools: BTreeMap<ResourceKind, ResourcePool>,
}

impl ResourcePools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, pool: ResourcePool) -> Self {
        self.pools.insert(kind, pool);
        self
    }

    pub fn insert(&mut self, kind: ResourceKind, pool: ResourcePool) {
        self.pools.insert(kind, pool);
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&ResourcePool> {
        self.pools.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &ResourcePool)> {
        self.pools.iter().map(|(kind, pool)| (*kind, pool))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(ResourceKind::from_str("energy"), Ok(ResourceKind::Energy));
        assert_eq!(ResourceKind::from_str("HolyPower"), Ok(ResourceKind::HolyPower));
        assert!(ResourceKind::from_str("gold").is_err());
        assert_eq!(ResourceKind::ComboPoints.to_string(), "ComboPoints");
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in ResourceKind::iter() {
            assert_eq!(ResourceKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn consistency_rejects_overflow_and_negatives() {
        assert!(ResourcePool::new(50.0, 100.0).is_consistent());
        assert!(!ResourcePool::new(120.0, 100.0).is_consistent());
        assert!(!ResourcePool::new(-1.0, 100.0).is_consistent());
        assert!(!ResourcePool::new(f32::NAN, 100.0).is_consistent());
    }
}
