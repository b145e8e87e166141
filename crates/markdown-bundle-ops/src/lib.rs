//! Build operations for markdown-bundle.
//!
//! The orchestrator runs the stages of a pass in sequence:
//! collect → parse → sort → combine → optimize → write.
//! Each stage is sequential; a failure aborts the pass and no partial output
//! is written. `watch()` re-runs the whole pipeline on debounced file-system
//! events and logs per-iteration failures without terminating.

mod builder;
mod collect;
mod combine;
mod watch;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use builder::Builder;
pub use collect::collect;
pub use combine::{combine, generate_toc};

/// Errors surfaced by the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no input files matched {patterns:?} under {}", dir.display())]
    NoInputs { dir: PathBuf, patterns: Vec<String> },
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}
