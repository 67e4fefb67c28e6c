//! Error types for export jobs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::media::MediaError;

/// Reasons an export is refused before any work starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRejected {
    #[error("Please add at least one video clip to export.")]
    NoClips,

    #[error("No destination file was chosen.")]
    NoDestination,

    #[error("An export is already running.")]
    AlreadyRunning,
}

/// Failure while an export is running.
///
/// The display text is shown to the user as-is.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Moving the finished file into place failed.
    #[error("Could not save {path}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The worker thread panicked.
    #[error("Export stopped unexpectedly: {0}")]
    Panicked(String),
}
