//! Error types surfaced at the runtime boundary.
//!
//! Nothing here is raised from inside a tree walk: a failing guard is just
//! `Failure`, and a bad snapshot degrades the tick. These errors cover
//! loading configuration and rotations before the first tick.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `origin` is the file path, or `<inline>` for in-memory text.
    #[error("failed to parse RON from {origin}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
