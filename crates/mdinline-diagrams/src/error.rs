//! Fatal inliner errors.
//!
//! Per-diagram render failures are not errors at this level; they are
//! collected in [`DocumentReport`](crate::DocumentReport). Anything here aborts
//! the whole run.

use std::path::{Path, PathBuf};

use crate::job::DocumentConflict;

/// Error that aborts an inliner run.
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    /// Filesystem error while reading or writing a document or its images.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document list names one file twice or two documents share images.
    #[error(transparent)]
    Conflict(#[from] DocumentConflict),
    /// The document worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl InlineError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
