use crate::predicates::RefreshPolicy;
use crate::targeting::TargetPolicy;

/// Engine-wide tunables consulted by guards and the target resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Pandemic window used by refresh checks.
    pub refresh: RefreshPolicy,
    /// Validity constraints for the primary target.
    pub targeting: TargetPolicy,
    /// Default look-ahead (seconds) for "charge available soon" guards.
    pub charge_horizon: f32,
    /// How an unknown time-to-death estimate is read by long-setup guards.
    pub assume_unknown_ttd_long: bool,
}

impl EngineConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CHARGE_HORIZON: f32 = 1.5;
    pub const DEFAULT_ASSUME_UNKNOWN_TTD_LONG: bool = false;

    pub const fn new() -> Self {
        Self {
            refresh: RefreshPolicy::new(RefreshPolicy::DEFAULT_FRACTION),
            targeting: TargetPolicy::new(),
            charge_horizon: Self::DEFAULT_CHARGE_HORIZON,
            assume_unknown_ttd_long: Self::DEFAULT_ASSUME_UNKNOWN_TTD_LONG,
        }
    }

    pub const fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub const fn with_targeting(mut self, targeting: TargetPolicy) -> Self {
        self.targeting = targeting;
        self
    }

    pub const fn with_charge_horizon(mut self, charge_horizon: f32) -> Self {
        self.charge_horizon = charge_horizon;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
