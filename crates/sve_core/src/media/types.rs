//! Media handle types and errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised at the media tool boundary.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The external tool could not be started.
    #[error("{tool} not found or not executable: {message}")]
    ToolNotFound { tool: String, message: String },

    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// ffprobe could not read the file.
    #[error("Could not read {path}: {message}")]
    ProbeFailed { path: PathBuf, message: String },

    /// The file has no video stream.
    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    /// The file has no audio stream.
    #[error("No audio stream found in {0}")]
    NoAudioStream(PathBuf),

    /// An external command returned a failure.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Tool output could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Nothing to concatenate.
    #[error("No clips to concatenate")]
    EmptyComposition,
}

impl MediaError {
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn probe_failed(path: &Path, message: impl Into<String>) -> Self {
        Self::ProbeFailed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Video stream properties of an opened clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    /// Frames per second.
    pub fps: f64,
}

/// An opened video clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipHandle {
    pub path: PathBuf,
    /// Duration in seconds.
    pub duration: f64,
    pub video: VideoProperties,
    /// Whether the clip carries its own audio.
    pub has_audio: bool,
}

/// An opened audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioHandle {
    pub path: PathBuf,
    /// Duration in seconds.
    pub duration: f64,
}

/// Codecs used for the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportCodecs {
    pub video: &'static str,
    pub audio: &'static str,
}

impl ExportCodecs {
    /// H.264 video with AAC audio.
    pub const STANDARD: ExportCodecs = ExportCodecs {
        video: "libx264",
        audio: "aac",
    };
}

impl Default for ExportCodecs {
    fn default() -> Self {
        Self::STANDARD
    }
}
