//! Command implementations for rotation-replay
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod run;

pub use check::Check;
pub use run::Run;
