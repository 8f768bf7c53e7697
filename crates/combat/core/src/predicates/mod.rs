//! Timing and resource predicates.
//!
//! Pure functions over snapshot data. They have no side effects and are safe
//! to call redundantly, which makes their inputs ideal cache keys.
//!
//! - [`timing`]: refresh windows and time-to-expiry gating
//! - [`charges`]: whole and fractional charge availability
//! - [`resources`]: pool thresholds and regeneration math
//! - [`Tristate`]: answers that may legitimately be "unknown"

pub mod charges;
pub mod resources;
pub mod timing;
mod tristate;

pub use charges::{
    can_cast_now, charges_at, charges_available_by, full_recharge_in, time_until_charges,
};
pub use resources::{
    deficit, fraction, resource_above, resource_at_least, resource_below, time_to_reach,
};
pub use timing::{
    Expiring, RefreshPolicy, is_refreshable, stacks_at_least, time_to_expiry_exceeds,
};
pub use tristate::Tristate;
