//! Resource pool thresholds.
//!
//! Thresholds are resolved numbers. When a threshold depends on other state
//! (e.g. "spend at 4 combo points, 3 if more than two enemies") the caller
//! computes it first.

use crate::resource::ResourcePool;

/// Strictly above `threshold`.
pub fn resource_above(pool: &ResourcePool, threshold: f32) -> bool {
    pool.current > threshold
}

/// Strictly below `threshold`.
pub fn resource_below(pool: &ResourcePool, threshold: f32) -> bool {
    pool.current < threshold
}

/// At or above `amount` (i.e. "can afford").
pub fn resource_at_least(pool: &ResourcePool, amount: f32) -> bool {
    pool.current >= amount
}

/// Room left before the pool caps.
pub fn deficit(pool: &ResourcePool) -> f32 {
    (pool.max - pool.current).max(0.0)
}

/// Fill level in `[0, 1]`. An empty-capacity pool reads as full.
pub fn fraction(pool: &ResourcePool) -> f32 {
    if pool.max <= 0.0 {
        1.0
    } else {
        (pool.current / pool.max).clamp(0.0, 1.0)
    }
}

/// Seconds until the pool holds `amount`, from passive regeneration alone.
///
/// `None` if `amount` exceeds the cap or the pool does not regenerate.
pub fn time_to_reach(pool: &ResourcePool, amount: f32) -> Option<f32> {
    if amount > pool.max {
        return None;
    }
    if pool.current >= amount {
        return Some(0.0);
    }
    if pool.regen_per_second <= 0.0 {
        return None;
    }
    Some((amount - pool.current) / pool.regen_per_second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_comparisons_are_strict() {
        let pool = ResourcePool::new(40.0, 100.0);
        assert!(!resource_above(&pool, 40.0));
        assert!(!resource_below(&pool, 40.0));
        assert!(resource_at_least(&pool, 40.0));
        assert!(resource_above(&pool, 39.9));
    }

    #[test]
    fn deficit_and_fraction() {
        let pool = ResourcePool::new(75.0, 100.0);
        assert_eq!(deficit(&pool), 25.0);
        assert_eq!(fraction(&pool), 0.75);
        assert_eq!(fraction(&ResourcePool::new(0.0, 0.0)), 1.0);
    }

    #[test]
    fn regen_time() {
        let pool = ResourcePool::new(20.0, 100.0).with_regen(10.0);
        assert_eq!(time_to_reach(&pool, 50.0), Some(3.0));
        assert_eq!(time_to_reach(&pool, 10.0), Some(0.0));
        assert_eq!(time_to_reach(&pool, 150.0), None);
        assert_eq!(time_to_reach(&ResourcePool::new(2.0, 5.0), 4.0), None);
    }
}
