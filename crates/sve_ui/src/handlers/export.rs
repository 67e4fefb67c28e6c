//! Export handlers: validation, worker launch and worker events.

use std::path::PathBuf;
use std::sync::Arc;

use iced::futures::channel::mpsc;
use iced::Task;

use sve_core::export::{
    spawn_export, EventSink, ExportEvent, ExportJob, ExportRejected, ExportReport,
};
use sve_core::logging::LogConfig;
use sve_core::playlist::display_name;

use super::dialogs::{show_error, show_info};
use crate::app::{App, FolderType, Message, READY};

const NO_VIDEOS_TITLE: &str = "No Videos";
const EXPORT_RUNNING_TITLE: &str = "Export Running";

impl App {
    /// Export button pressed: validate, then ask for a destination.
    pub fn start_export(&mut self) -> Task<Message> {
        if !self.is_idle() {
            return Task::none();
        }
        if self.choosing_destination {
            self.set_status("Choose where to save the video first.");
            return Task::none();
        }
        if self.playlist.is_empty() {
            return show_error(NO_VIDEOS_TITLE, ExportRejected::NoClips.to_string());
        }
        self.choosing_destination = true;
        self.browse_destination()
    }

    /// Destination chosen (or cancelled): snapshot the playlist and start.
    pub fn handle_destination_picked(&mut self, destination: Option<PathBuf>) -> Task<Message> {
        self.choosing_destination = false;
        if destination.is_none() {
            self.set_status("Export cancelled.");
            return Task::none();
        }

        let job = match ExportJob::prepare(&self.playlist, destination) {
            Ok(job) => job,
            Err(ExportRejected::NoClips) => {
                return show_error(NO_VIDEOS_TITLE, ExportRejected::NoClips.to_string());
            }
            Err(rejected) => {
                self.set_status(rejected.to_string());
                return Task::none();
            }
        };

        if let Err(rejected) = self.export_state.begin(&job) {
            self.append_log(&format!(
                "Ignored destination {}: {}",
                job.destination().display(),
                rejected
            ));
            return show_info(EXPORT_RUNNING_TITLE, rejected.to_string());
        }

        self.remember_folder(FolderType::Export, job.destination());
        self.set_status(format!("Exporting to {}...", display_name(job.destination())));
        self.append_log(&format!(
            "Starting export of {} clip(s) to {}",
            job.clips().len(),
            job.destination().display()
        ));

        self.launch_worker(job)
    }

    /// Spawn the worker and stream its events back as messages.
    fn launch_worker(&mut self, job: ExportJob) -> Task<Message> {
        let (sender, receiver) = mpsc::unbounded();
        let sink: EventSink = Arc::new(move |event: ExportEvent| {
            // Receiver gone means the window closed; nothing left to notify
            let _ = sender.unbounded_send(event);
        });

        let settings = &self.config.settings().logging;
        let log_config = LogConfig::from(settings);
        let logs_dir = settings
            .file_logging
            .then(|| self.config.logs_folder());

        match spawn_export(job, Arc::clone(&self.backend), log_config, logs_dir, sink) {
            Ok(_handle) => Task::run(receiver, Message::Worker),
            Err(e) => {
                tracing::error!("Failed to start export worker: {}", e);
                self.handle_worker_event(ExportEvent::Finished(Err(format!(
                    "Could not start export: {}",
                    e
                ))))
            }
        }
    }

    pub fn handle_worker_event(&mut self, event: ExportEvent) -> Task<Message> {
        match event {
            ExportEvent::Phase(phase) => {
                self.export_state.set_phase(phase);
                self.set_status(phase.status_text());
                Task::none()
            }
            ExportEvent::Log(line) => {
                self.append_raw_log(&line);
                Task::none()
            }
            ExportEvent::Finished(Ok(report)) => {
                self.export_state.finish();
                self.handle_export_success(&report)
            }
            ExportEvent::Finished(Err(reason)) => {
                self.export_state.finish();
                self.set_status("Export failed. Ready.");
                show_error("Export Error", format!("An error occurred:\n{}", reason))
            }
        }
    }

    fn handle_export_success(&mut self, report: &ExportReport) -> Task<Message> {
        self.set_status(READY);
        if report.soundtrack_truncated {
            self.append_log("Music was trimmed to the video length.");
        }
        if let Some(log) = &report.log_path {
            self.append_log(&format!("Export log: {}", log.display()));
        }
        show_info(
            "Export Complete",
            format!("Video saved to:\n{}", report.destination.display()),
        )
    }
}
