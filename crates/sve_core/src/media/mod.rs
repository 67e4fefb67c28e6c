//! Media module - the boundary to the external multimedia tool.
//!
//! Everything that decodes, composites or encodes goes through
//! [`MediaBackend`]. The export worker only plans with [`compose`] and hands
//! the result to a backend; [`FfmpegBackend`] is the production one.

pub mod compose;
mod ffmpeg;
pub mod probe;
pub mod tools;
mod types;

use std::path::Path;

pub use compose::{
    attach_audio, concatenate, Canvas, CompositingMode, Composition, Segment, Soundtrack,
};
pub use ffmpeg::{build_filter_graph, build_write_args, FfmpegBackend};
pub use tools::{missing_tools, validate_tools, ToolStatus};
pub use types::{AudioHandle, ClipHandle, ExportCodecs, MediaError, MediaResult, VideoProperties};

use crate::logging::ExportLogger;

/// Opens, composites and encodes media files.
///
/// Handles returned by the open methods must be passed back to the matching
/// release method once the caller is done with them.
pub trait MediaBackend: Send + Sync {
    /// Open a video clip, reading its duration, frame size and rate.
    fn open_clip(&self, path: &Path) -> MediaResult<ClipHandle>;

    /// Open an audio file, reading its duration.
    fn open_audio(&self, path: &Path) -> MediaResult<AudioHandle>;

    /// Render `composition` to `destination`.
    fn write(
        &self,
        composition: &Composition,
        destination: &Path,
        codecs: ExportCodecs,
        logger: &ExportLogger,
    ) -> MediaResult<()>;

    fn release_clip(&self, clip: &ClipHandle) {
        tracing::trace!("Released clip {}", clip.path.display());
    }

    fn release_audio(&self, audio: &AudioHandle) {
        tracing::trace!("Released audio {}", audio.path.display());
    }
}
