//! Charge availability, now and predicted.
//!
//! Fractional charges are carried through every computation; truncating
//! early makes predictive gates fire too late (or too early).

use crate::ability::AbilityState;

/// Can the ability be used this tick? Needs a whole charge and no lockout.
pub fn can_cast_now(ability: &AbilityState) -> bool {
    ability.cooldown_remaining <= 0.0 && ability.current_charges >= 1.0
}

/// Will at least one charge be available within `horizon` seconds?
///
/// True if a charge is banked now, or if recovery progress reaches a whole
/// charge by the horizon: `current + horizon / recharge_time >= 1`.
pub fn charges_available_by(ability: &AbilityState, horizon: f32) -> bool {
    if ability.current_charges >= 1.0 {
        return true;
    }
    if ability.recharge_time <= 0.0 {
        return false;
    }
    ability.current_charges + horizon.max(0.0) / ability.recharge_time >= 1.0
}

/// Fractional charges the ability will hold after `horizon` seconds.
pub fn charges_at(ability: &AbilityState, horizon: f32) -> f32 {
    let max = ability.max_charges as f32;
    if ability.recharge_time <= 0.0 {
        return ability.current_charges.min(max);
    }
    (ability.current_charges + horizon.max(0.0) / ability.recharge_time).min(max)
}

/// Seconds until the ability holds `n` charges.
///
/// `None` if `n` exceeds the maximum or the ability does not recharge.
pub fn time_until_charges(ability: &AbilityState, n: u32) -> Option<f32> {
    if n > ability.max_charges {
        return None;
    }
    let missing = n as f32 - ability.current_charges;
    if missing <= 0.0 {
        return Some(0.0);
    }
    if ability.recharge_time <= 0.0 {
        return None;
    }
    Some(missing * ability.recharge_time)
}

/// Seconds until every charge is recovered (capping soon means waste).
pub fn full_recharge_in(ability: &AbilityState) -> Option<f32> {
    time_until_charges(ability, ability.max_charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AbilityId;

    fn partial() -> AbilityState {
        AbilityState::with_charges(AbilityId(1), 0.8, 2, 10.0)
    }

    #[test]
    fn fractional_charge_prediction() {
        let ability = partial();
        assert!(charges_available_by(&ability, 3.0));
        assert!(!charges_available_by(&ability, 1.0));
        assert!(!can_cast_now(&ability));
    }

    #[test]
    fn banked_charge_is_available_immediately() {
        let ability = AbilityState::with_charges(AbilityId(1), 1.0, 2, 10.0);
        assert!(can_cast_now(&ability));
        assert!(charges_available_by(&ability, 0.0));
    }

    #[test]
    fn lockout_blocks_cast_now() {
        let mut ability = AbilityState::with_charges(AbilityId(1), 2.0, 2, 10.0);
        ability.cooldown_remaining = 0.5;
        assert!(!can_cast_now(&ability));
    }

    #[test]
    fn non_recharging_ability_never_predicts_a_charge() {
        let ability = AbilityState::with_charges(AbilityId(1), 0.5, 1, 0.0);
        assert!(!charges_available_by(&ability, 1000.0));
        assert_eq!(time_until_charges(&ability, 1), None);
    }

    #[test]
    fn charges_accumulate_and_cap() {
        let ability = partial();
        assert!((charges_at(&ability, 5.0) - 1.3).abs() < 1e-5);
        assert_eq!(charges_at(&ability, 100.0), 2.0);
    }

    #[test]
    fn time_until_n_charges() {
        let ability = partial();
        let one = time_until_charges(&ability, 1).unwrap();
        assert!((one - 2.0).abs() < 1e-5);
        let full = full_recharge_in(&ability).unwrap();
        assert!((full - 12.0).abs() < 1e-5);
        assert_eq!(time_until_charges(&ability, 3), None);
        assert_eq!(time_until_charges(&ability, 0), Some(0.0));
    }
}
