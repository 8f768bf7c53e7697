//! Lightweight, deterministic behavior tree library for per-tick decision making.
//!
//! This library provides a priority-rule evaluator that is re-derived from
//! scratch every tick against a caller-supplied context.
//!
//! - **Sum-type nodes**: [`Node`] has exactly four variants, matched exhaustively
//! - **No cross-tick state**: nodes are immutable configuration; a tree can be
//!   shared read-only by every tick
//! - **Two-phase actions**: a pure guard gates an effect that may still be
//!   rejected by the execution layer
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Node`]: Action, Selector, Sequence, Decorator
//! - [`Status`]: Success, Failure, or Running (stop walking this tick)
//! - [`Outcome`]: What an action's effect reports
//! - [`Observer`]: Per-node evaluation callbacks for diagnostics
//! - [`builder`]: Helper constructors

pub mod builder;
pub mod composite;
pub mod decorator;
pub mod node;
pub mod observer;
pub mod status;

// Re-export core types for ergonomic API
pub use node::{Effect, Guard, Label, Node};
pub use observer::{NodeKind, NoopObserver, Observer, VisitLog};
pub use status::{Outcome, Status};
