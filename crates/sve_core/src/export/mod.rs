//! Export module - turns a playlist snapshot into one video file.
//!
//! The interface builds an [`ExportJob`] with [`ExportJob::prepare`], moves
//! [`ExportState`] to exporting, and hands the job to [`spawn_export`].
//! Progress comes back as [`ExportEvent`]s.

mod errors;
mod events;
mod job;
mod state;
mod worker;

pub use errors::{ExportError, ExportRejected};
pub use events::{EventSink, ExportEvent, ExportPhase, ExportReport};
pub use job::{partial_path, with_default_extension, ExportJob, DEFAULT_EXTENSION};
pub use state::ExportState;
pub use worker::{run_export, spawn_export, ExportOutcome};
