//! Tick-driven rotation engine.
//!
//! This crate binds the generic [`behavior_tree`] evaluator to the combat
//! data model in [`combat_core`]. A host builds a `Node<TickContext>` once
//! (by hand from [`nodes`] and [`subtrees`], or from a RON [`RotationSpec`]),
//! hands it to a [`RotationEngine`] with a [`CommitSink`], and calls
//! [`RotationEngine::tick`] with a fresh snapshot on every tick.
//!
//! Modules are organized by responsibility:
//! - [`context`] is the per-tick blackboard every guard and effect sees
//! - [`cache`] memoizes derived queries for exactly one tick
//! - [`nodes`] provides guard and effect constructors
//! - [`subtrees`] packages common rules and gates
//! - [`rotation`] compiles data-driven priority lists
//! - [`driver`] runs ticks and reports what happened
//! - [`sink`] and [`overlay`] are the outbound seams
pub mod cache;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod nodes;
pub mod overlay;
pub mod rotation;
pub mod sink;
pub mod subtrees;

pub use cache::{CacheStats, QueryCache, QueryKey, QueryValue, Radius};
pub use config::{RuntimeConfig, load_config, parse_config};
pub use context::TickContext;
pub use driver::{RotationEngine, TickReport};
pub use error::ConfigError;
pub use overlay::{AuxiliarySet, TargetOverlay, TargetReport, TracingOverlay};
pub use rotation::{ConditionSpec, PriorityEntry, RotationSpec, Subject, TargetChoice};
pub use sink::{AbilityAttempt, CommitSink, RecordingSink};
