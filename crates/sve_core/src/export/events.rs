//! Messages sent from the export worker to the interface.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Stage the worker is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    LoadingClips,
    AddingMusic,
    Writing,
}

impl ExportPhase {
    /// Status line shown while in this phase.
    pub fn status_text(&self) -> &'static str {
        match self {
            ExportPhase::LoadingClips => "Loading video clips...",
            ExportPhase::AddingMusic => "Adding music...",
            ExportPhase::Writing => "Writing video file (this may take a while)...",
        }
    }
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub destination: PathBuf,
    pub clip_count: usize,
    /// Output duration in seconds.
    pub duration: f64,
    /// Whether the music was cut to the video length.
    pub soundtrack_truncated: bool,
    pub log_path: Option<PathBuf>,
}

/// Worker to interface event.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Phase(ExportPhase),
    Log(String),
    /// Always the last event of an export. `Err` holds the reason shown to
    /// the user.
    Finished(Result<ExportReport, String>),
}

impl ExportEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, ExportEvent::Finished(_))
    }
}

/// Receiver of worker events. Called from the worker thread.
pub type EventSink = Arc<dyn Fn(ExportEvent) + Send + Sync>;
