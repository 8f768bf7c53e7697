//! Leaf vocabulary for rotation trees.
//!
//! - [`conditions`]: guards (pure checks over the tick context)
//! - [`actions`]: effects (target resolution + commit)
//!
//! Trees are assembled from these with the `behavior_tree::builder`
//! helpers or the higher-level [`subtrees`](crate::subtrees).

pub mod actions;
pub mod conditions;

pub use actions::{
    cast_on_lowest_ally, cast_on_primary, cast_on_self, cast_on_spread_target, cast_untargeted,
    hold_while_casting,
};
