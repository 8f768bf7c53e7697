//! Refresh windows and expiry gating.

use crate::effect::TimedEffect;
use crate::entity::Entity;
use crate::predicates::Tristate;

/// When a still-active effect is worth reapplying early.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefreshPolicy {
    /// Share of the base duration inside which a refresh is allowed
    /// (the "pandemic" window).
    pub fraction: f32,
}

impl RefreshPolicy {
    pub const DEFAULT_FRACTION: f32 = 0.3;

    pub const fn new(fraction: f32) -> Self {
        Self { fraction }
    }

    /// Remaining-duration threshold at or below which `effect` is refreshable.
    pub fn window(&self, effect: &TimedEffect) -> f32 {
        effect.base_duration * self.fraction
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRACTION)
    }
}

/// Is the effect absent, expired, untimed, or inside its refresh window?
///
/// The window boundary is inclusive.
pub fn is_refreshable(effect: Option<&TimedEffect>, policy: &RefreshPolicy) -> bool {
    let Some(effect) = effect else {
        return true;
    };
    if effect.is_untimed() || effect.remaining <= 0.0 {
        return true;
    }
    effect.remaining <= policy.window(effect)
}

/// `true` if the effect has at least `n` stacks. Absent effects have none.
pub fn stacks_at_least(effect: Option<&TimedEffect>, n: u32) -> bool {
    effect.map_or(n == 0, |e| e.stacks >= n)
}

/// Anything with a (possibly unknown) time until it goes away.
pub trait Expiring {
    /// Seconds until expiry, `None` if there is no basis for an estimate.
    fn time_to_expiry(&self) -> Option<f32>;
}

impl Expiring for TimedEffect {
    fn time_to_expiry(&self) -> Option<f32> {
        if self.is_untimed() {
            Some(f32::INFINITY)
        } else if self.remaining.is_nan() {
            None
        } else {
            Some(self.remaining.max(0.0))
        }
    }
}

/// An absent effect has already expired.
impl Expiring for Option<&TimedEffect> {
    fn time_to_expiry(&self) -> Option<f32> {
        match self {
            Some(effect) => effect.time_to_expiry(),
            None => Some(0.0),
        }
    }
}

impl Expiring for Entity {
    fn time_to_expiry(&self) -> Option<f32> {
        self.time_to_death
    }
}

/// Will `subject` last strictly longer than `horizon` seconds?
///
/// Missing or non-numeric estimates yield [`Tristate::Unknown`], never
/// `False`: "we don't know" is not "it expires immediately".
pub fn time_to_expiry_exceeds<E: Expiring + ?Sized>(subject: &E, horizon: f32) -> Tristate {
    match subject.time_to_expiry() {
        Some(t) if !t.is_nan() => Tristate::from(t > horizon),
        _ => Tristate::Unknown,
    }
}
