//! Background export worker.
//!
//! Runs one [`ExportJob`] against a [`MediaBackend`] on a dedicated thread
//! and reports through an [`EventSink`]. The final event of every export is
//! [`ExportEvent::Finished`], whether it succeeded, failed or panicked.

use std::any::Any;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::errors::ExportError;
use super::events::{EventSink, ExportEvent, ExportPhase, ExportReport};
use super::job::ExportJob;
use crate::logging::{ExportLogger, LineCallback, LogConfig};
use crate::media::{
    attach_audio, concatenate, AudioHandle, ClipHandle, CompositingMode, ExportCodecs,
    MediaBackend,
};
use crate::playlist::display_name;

/// Result of running one export.
pub type ExportOutcome = Result<ExportReport, ExportError>;

/// Releases every handle it holds when dropped.
struct OpenHandles<'a> {
    backend: &'a dyn MediaBackend,
    clips: Vec<ClipHandle>,
    audio: Option<AudioHandle>,
}

impl<'a> OpenHandles<'a> {
    fn new(backend: &'a dyn MediaBackend) -> Self {
        Self {
            backend,
            clips: Vec::new(),
            audio: None,
        }
    }
}

impl Drop for OpenHandles<'_> {
    fn drop(&mut self) {
        for clip in self.clips.drain(..) {
            self.backend.release_clip(&clip);
        }
        if let Some(audio) = self.audio.take() {
            self.backend.release_audio(&audio);
        }
    }
}

/// Run `job` to completion on the current thread.
pub fn run_export(
    job: &ExportJob,
    backend: &dyn MediaBackend,
    logger: &ExportLogger,
    sink: &dyn Fn(ExportEvent),
) -> ExportOutcome {
    let enter = |phase: ExportPhase| {
        logger.phase(phase.status_text());
        sink(ExportEvent::Phase(phase));
    };

    logger.info(&format!(
        "Exporting {} clip(s) to {}",
        job.clips().len(),
        job.destination().display()
    ));

    let mut handles = OpenHandles::new(backend);

    enter(ExportPhase::LoadingClips);
    for path in job.clips() {
        let clip = backend.open_clip(path)?;
        logger.info(&format!(
            "{}: {}x{} @ {:.2} fps, {:.2}s{}",
            display_name(path),
            clip.video.width,
            clip.video.height,
            clip.video.fps,
            clip.duration,
            if clip.has_audio { "" } else { " (no audio)" }
        ));
        handles.clips.push(clip);
    }

    let mut composition = concatenate(&handles.clips, CompositingMode::Compose)?;
    logger.debug(&format!(
        "Canvas {}x{} @ {:.3} fps",
        composition.canvas.width, composition.canvas.height, composition.canvas.fps
    ));

    if let Some(audio_path) = job.audio() {
        enter(ExportPhase::AddingMusic);
        let audio = backend.open_audio(audio_path)?;
        composition = attach_audio(composition, &audio);
        handles.audio = Some(audio);

        if let Some(track) = composition.soundtrack.as_ref().filter(|t| t.truncated) {
            logger.info(&format!("Music trimmed to {:.2}s", track.duration));
        }
    }

    enter(ExportPhase::Writing);
    let partial = job.partial_path();
    logger.clear_tail();

    if let Err(e) = backend.write(&composition, &partial, ExportCodecs::STANDARD, logger) {
        remove_partial(&partial);
        return Err(e.into());
    }

    if let Err(source) = fs::rename(&partial, job.destination()) {
        remove_partial(&partial);
        return Err(ExportError::Finalize {
            path: job.destination().to_path_buf(),
            source,
        });
    }

    logger.success(&format!("Video saved to {}", job.destination().display()));

    Ok(ExportReport {
        destination: job.destination().to_path_buf(),
        clip_count: handles.clips.len(),
        duration: composition.duration(),
        soundtrack_truncated: composition
            .soundtrack
            .as_ref()
            .is_some_and(|t| t.truncated),
        log_path: logger.log_path().map(Path::to_path_buf),
    })
}

/// Start the export on its own thread.
///
/// Exactly one `Finished` event is sent, after every other event.
pub fn spawn_export(
    job: ExportJob,
    backend: Arc<dyn MediaBackend>,
    log_config: LogConfig,
    logs_dir: Option<PathBuf>,
    sink: EventSink,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("export-worker".to_string())
        .spawn(move || {
            tracing::info!("Export {} started", job.name());
            let logger = create_logger(&job, log_config, logs_dir.as_deref(), &sink);

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                run_export(&job, backend.as_ref(), &logger, sink.as_ref())
            }))
            .unwrap_or_else(|payload| Err(ExportError::Panicked(panic_message(payload))));

            let result = match outcome {
                Ok(report) => {
                    tracing::info!(
                        "Export {} finished: {}",
                        job.name(),
                        report.destination.display()
                    );
                    Ok(report)
                }
                Err(e) => {
                    let reason = e.to_string();
                    logger.error(&reason);
                    tracing::error!("Export {} failed: {}", job.name(), reason);
                    Err(reason)
                }
            };

            logger.close();
            sink(ExportEvent::Finished(result));
        })
}

fn create_logger(
    job: &ExportJob,
    config: LogConfig,
    logs_dir: Option<&Path>,
    sink: &EventSink,
) -> ExportLogger {
    let forward = || -> LineCallback {
        let sink = Arc::clone(sink);
        Box::new(move |line: &str| sink(ExportEvent::Log(line.to_string())))
    };

    if let Some(dir) = logs_dir {
        match ExportLogger::new(job.name(), dir, config.clone(), Some(forward())) {
            Ok(logger) => return logger,
            Err(e) => tracing::warn!("Could not create export log in {}: {}", dir.display(), e),
        }
    }
    ExportLogger::without_file(config, Some(forward()))
}

fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove partial file {}: {}", path.display(), e);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
