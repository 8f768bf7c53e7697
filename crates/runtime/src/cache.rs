//! Tick-scoped memoization of derived world queries.
//!
//! Independent branches of a rotation routinely ask the same question ("how
//! many hostiles within 8 yards of the target?") in one tick. The
//! [`QueryCache`] answers the second asker from memory.
//!
//! # Invalidation
//!
//! Entries are stamped with the epoch they were computed in. Advancing the
//! epoch at tick start invalidates every entry at once; a stale entry is
//! simply overwritten in place on its next use, so the map keeps its
//! allocation across ticks.

use std::collections::HashMap;

use combat_core::{EffectId, EntityId};

/// A query radius quantized to thousandths of a unit so it can key a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Radius(u32);

impl Radius {
    pub fn new(units: f32) -> Self {
        if units.is_finite() && units > 0.0 {
            // u32::MAX is reserved for an unbounded radius
            Self(((units * 1000.0).round() as u32).min(u32::MAX - 1))
        } else if units == f32::INFINITY {
            Self(u32::MAX)
        } else {
            Self(0)
        }
    }

    pub fn units(self) -> f32 {
        if self.0 == u32::MAX {
            f32::INFINITY
        } else {
            self.0 as f32 / 1000.0
        }
    }

    pub fn contains(self, distance: f32) -> bool {
        distance <= self.units()
    }
}

/// The kind and arguments of a cached query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The resolved primary target.
    PrimaryTarget,
    /// Live in-combat hostiles within a radius of the actor.
    HostilesWithin(Radius),
    /// Live in-combat hostiles within a radius of an entity.
    HostilesNear { center: EntityId, radius: Radius },
    /// Hostiles within a radius of the actor lacking the actor's effect.
    MissingEffect { effect: EffectId, radius: Radius },
    /// Best candidate to receive a spread effect.
    SpreadTarget { effect: EffectId, radius: Radius },
    /// Most injured live ally within a radius.
    LowestHealthAlly(Radius),
}

/// A cached answer.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Count(usize),
    Entity(Option<EntityId>),
    Entities(Vec<EntityId>),
}

impl QueryValue {
    pub fn as_count(&self) -> Option<usize> {
        match self {
            QueryValue::Count(n) => Some(*n),
            QueryValue::Entities(ids) => Some(ids.len()),
            _ => None,
        }
    }

    /// The entity answer; `None` both for "no entity" and for a value of
    /// another kind.
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            QueryValue::Entity(id) => *id,
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[EntityId]> {
        match self {
            QueryValue::Entities(ids) => Some(ids),
            _ => None,
        }
    }
}

/// Hit/miss counters for the current epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Epoch-invalidated memo table.
#[derive(Debug, Default)]
pub struct QueryCache {
    epoch: u64,
    entries: HashMap<QueryKey, (u64, QueryValue)>,
    stats: CacheStats,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidates every entry and resets the counters. Returns the new epoch.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.stats = CacheStats::default();
        self.epoch
    }

    /// Returns the cached value for `key`, computing it on the first call in
    /// the current epoch.
    pub fn get_or_compute<F>(&mut self, key: QueryKey, compute: F) -> QueryValue
    where
        F: FnOnce() -> QueryValue,
    {
        let epoch = self.epoch;
        if let Some((stamp, value)) = self.entries.get(&key)
            && *stamp == epoch
        {
            self.stats.hits += 1;
            return value.clone();
        }

        self.stats.misses += 1;
        let value = compute();
        self.entries.insert(key, (epoch, value.clone()));
        value
    }

    /// The value for `key` if it was computed in the current epoch.
    pub fn peek(&self, key: &QueryKey) -> Option<&QueryValue> {
        self.entries
            .get(key)
            .filter(|(stamp, _)| *stamp == self.epoch)
            .map(|(_, value)| value)
    }

    /// Number of entries valid in the current epoch.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|(stamp, _)| *stamp == self.epoch)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
