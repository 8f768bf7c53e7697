//! Reusable rotation subtrees.
//!
//! Patterns wrap the leaf vocabulary in [`nodes`](crate::nodes) into whole
//! priority entries. A rotation is a selector over patterns, highest
//! priority first:
//!
//! ```text
//! selector("rotation")
//!     ├─ hold_while_casting()
//!     ├─ aoe_gate(3, 8.0)
//!     │   ├─ spread_effect(..)
//!     │   └─ filler(nova)
//!     ├─ maintain_effect(..)
//!     └─ filler(bolt)
//! ```
//!
//! Data-driven rotations ([`RotationSpec`](crate::rotation::RotationSpec))
//! compile to the same shapes.

pub mod patterns;
