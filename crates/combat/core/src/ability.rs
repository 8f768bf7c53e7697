//! Ability cooldown and charge state.

use std::collections::BTreeMap;

use crate::ids::AbilityId;

/// Cooldown/charge facts for one ability at snapshot time.
///
/// `current_charges` is fractional: `1.6` means one charge is banked and the
/// next is 60% recovered. Only predictive checks look at the fraction;
/// casting now always needs a whole charge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityState {
    pub id: AbilityId,
    /// Base cooldown (or duration) in seconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: f32,
    /// Lockout left before the ability can be used regardless of charges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_remaining: f32,
    pub max_charges: u32,
    pub current_charges: f32,
    /// Seconds to recover one charge. Zero if the ability does not recharge.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recharge_time: f32,
    /// Whether the primary target is within this ability's range.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub in_range: bool,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl AbilityState {
    /// A single-charge ability that is ready now.
    pub fn ready(id: AbilityId) -> Self {
        Self {
            id,
            cooldown: 0.0,
            cooldown_remaining: 0.0,
            max_charges: 1,
            current_charges: 1.0,
            recharge_time: 0.0,
            in_range: true,
        }
    }

    /// A charge-based ability with `current` (possibly fractional) charges.
    pub fn with_charges(id: AbilityId, current: f32, max: u32, recharge_time: f32) -> Self {
        Self {
            id,
            cooldown: recharge_time,
            cooldown_remaining: 0.0,
            max_charges: max,
            current_charges: current,
            recharge_time,
            in_range: true,
        }
    }

    /// A single-charge ability whose cooldown has `remaining` seconds left.
    pub fn on_cooldown(id: AbilityId, cooldown: f32, remaining: f32) -> Self {
        let progress = if cooldown > 0.0 {
            (1.0 - remaining / cooldown).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            id,
            cooldown,
            cooldown_remaining: remaining,
            max_charges: 1,
            current_charges: progress,
            recharge_time: cooldown,
            in_range: true,
        }
    }

    pub fn out_of_range(mut self) -> Self {
        self.in_range = false;
        self
    }
}

/// The actor's abilities, keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityBook {
    abilities: BTreeMap<AbilityId, AbilityState>,
}

impl AbilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces any existing entry with the same id.
    pub fn with(mut self, ability: AbilityState) -> Self {
        self.insert(ability);
        self
    }

    pub fn insert(&mut self, ability: AbilityState) {
        self.abilities.insert(ability.id, ability);
    }

    pub fn get(&self, id: AbilityId) -> Option<&AbilityState> {
        self.abilities.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityState> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl FromIterator<AbilityState> for AbilityBook {
    fn from_iter<T: IntoIterator<Item = AbilityState>>(iter: T) -> Self {
        let mut book = Self::new();
        for ability in iter {
            book.insert(ability);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_progress_becomes_fractional_charge() {
        let ability = AbilityState::on_cooldown(AbilityId(1), 10.0, 2.0);
        assert!((ability.current_charges - 0.8).abs() < 1e-6);
        assert_eq!(ability.recharge_time, 10.0);
    }

    #[test]
    fn book_is_keyed_by_id() {
        let book = AbilityBook::new()
            .with(AbilityState::ready(AbilityId(3)))
            .with(AbilityState::with_charges(AbilityId(3), 0.5, 2, 8.0));

        assert_eq!(book.len(), 1);
        assert_eq!(book.get(AbilityId(3)).map(|a| a.max_charges), Some(2));
        assert!(book.get(AbilityId(4)).is_none());
    }
}
