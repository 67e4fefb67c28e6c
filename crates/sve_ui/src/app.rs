//! Application state and message dispatch.
//!
//! `App` owns the playlist, the selection and the export state. Handlers
//! live in `handlers/` as `impl App` blocks; the view lives in `pages/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use iced::event::{self, Event};
use iced::{window, Element, Subscription, Task};

use sve_core::config::{ConfigManager, ConfigSection};
use sve_core::export::{ExportEvent, ExportState};
use sve_core::media::{FfmpegBackend, MediaBackend, ToolStatus};
use sve_core::playlist::Playlist;

use crate::pages;

/// Window title.
pub const TITLE: &str = "Simple Video Editor";

/// Status line when nothing is happening.
pub const READY: &str = "Ready.";

/// Lines kept in the log panel; older ones are dropped.
pub const LOG_PANEL_LINES: usize = 2000;

/// Which file picker a remembered folder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderType {
    Clips,
    Audio,
    Export,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Clip list
    AddClips,
    ClipsPicked(Option<Vec<PathBuf>>),
    SelectClip(usize),
    RemoveSelected,
    MoveUp,
    MoveDown,

    // Music
    AddMusic,
    MusicPicked(Option<PathBuf>),
    RemoveMusic,

    // Export
    Export,
    DestinationPicked(Option<PathBuf>),
    Worker(ExportEvent),

    // Window
    FileDropped(PathBuf),
    ToolsChecked(Vec<ToolStatus>),
    DialogClosed,
}

pub struct App {
    pub config: ConfigManager,
    pub playlist: Playlist,
    /// Index into the clip list.
    pub selected: Option<usize>,
    pub export_state: ExportState,
    pub status_text: String,
    pub log_text: String,
    log_lines: usize,
    /// A save dialog is open.
    pub choosing_destination: bool,
    pub backend: Arc<dyn MediaBackend>,
}

impl App {
    pub fn new(config: ConfigManager) -> (Self, Task<Message>) {
        let backend = Arc::new(FfmpegBackend::from_settings(&config.settings().tools));
        let app = Self::with_backend(config, backend);
        let check = app.check_tools();
        (app, check)
    }

    /// Build the app around a given media backend.
    pub fn with_backend(config: ConfigManager, backend: Arc<dyn MediaBackend>) -> Self {
        let mut app = Self {
            config,
            playlist: Playlist::new(),
            selected: None,
            export_state: ExportState::Idle,
            status_text: READY.to_string(),
            log_text: String::new(),
            log_lines: 0,
            choosing_destination: false,
            backend,
        };
        app.append_log(&format!(
            "{} started. Core version: {}",
            TITLE,
            sve_core::version()
        ));
        app.append_log(&format!("Config: {}", app.config.path().display()));
        app
    }

    pub fn title(&self) -> String {
        if self.export_state.is_busy() {
            format!("{} - Exporting", TITLE)
        } else {
            TITLE.to_string()
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddClips => return self.browse_clips(),
            Message::ClipsPicked(paths) => self.handle_clips_picked(paths),
            Message::SelectClip(idx) => self.handle_select_clip(idx),
            Message::RemoveSelected => self.handle_remove_selected(),
            Message::MoveUp => self.handle_move_up(),
            Message::MoveDown => self.handle_move_down(),

            Message::AddMusic => return self.browse_music(),
            Message::MusicPicked(path) => self.handle_music_picked(path),
            Message::RemoveMusic => self.handle_remove_music(),

            Message::Export => return self.start_export(),
            Message::DestinationPicked(path) => return self.handle_destination_picked(path),
            Message::Worker(event) => return self.handle_worker_event(event),

            Message::FileDropped(path) => self.handle_file_dropped(path),
            Message::ToolsChecked(statuses) => return self.handle_tools_checked(statuses),
            Message::DialogClosed => {}
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        pages::main_window::view(self)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _id| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Whether editing controls accept input.
    pub fn is_idle(&self) -> bool {
        !self.export_state.is_busy()
    }

    /// Append a timestamped line to the log panel.
    pub fn append_log(&mut self, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        self.push_log_line(&format!("[{}] {}", timestamp, message));
    }

    /// Append a line that already carries its own timestamp.
    pub fn append_raw_log(&mut self, line: &str) {
        self.push_log_line(line);
    }

    fn push_log_line(&mut self, line: &str) {
        for part in line.lines() {
            self.log_text.push_str(part);
            self.log_text.push('\n');
            self.log_lines += 1;
        }

        if self.log_lines > LOG_PANEL_LINES {
            let excess = self.log_lines - LOG_PANEL_LINES;
            let cut = self
                .log_text
                .match_indices('\n')
                .nth(excess - 1)
                .map_or(0, |(idx, _)| idx + 1);
            self.log_text.drain(..cut);
            self.log_lines = LOG_PANEL_LINES;
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    /// Folder a picker should open in, if one was remembered.
    pub fn last_folder(&self, folder_type: FolderType) -> Option<PathBuf> {
        let paths = &self.config.settings().paths;
        let folder = match folder_type {
            FolderType::Clips => &paths.last_clip_folder,
            FolderType::Audio => &paths.last_audio_folder,
            FolderType::Export => &paths.last_export_folder,
        };
        Some(PathBuf::from(folder)).filter(|p| !folder.is_empty() && p.is_dir())
    }

    /// Remember the folder containing `file` for the next picker.
    pub fn remember_folder(&mut self, folder_type: FolderType, file: &Path) {
        let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };
        let folder = parent.to_string_lossy().to_string();

        let paths = &mut self.config.settings_mut().paths;
        let slot = match folder_type {
            FolderType::Clips => &mut paths.last_clip_folder,
            FolderType::Audio => &mut paths.last_audio_folder,
            FolderType::Export => &mut paths.last_export_folder,
        };
        if *slot == folder {
            return;
        }
        *slot = folder;

        if let Err(e) = self.config.update_section(ConfigSection::Paths) {
            tracing::warn!("Failed to save remembered folder: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn log_panel_keeps_only_recent_lines() {
        let (mut app, _dir) = test_app();

        for i in 0..LOG_PANEL_LINES + 50 {
            app.append_raw_log(&format!("frame {}", i));
        }

        assert_eq!(app.log_text.lines().count(), LOG_PANEL_LINES);
        let last = format!("frame {}", LOG_PANEL_LINES + 49);
        assert_eq!(app.log_text.lines().last(), Some(last.as_str()));
        assert!(!app.log_text.contains("frame 49\n"));
        assert!(app.log_text.starts_with("frame 50\n"));
    }

    #[test]
    fn multi_line_messages_count_every_line() {
        let (mut app, _dir) = test_app();
        let before = app.log_text.lines().count();

        app.append_raw_log("first\nsecond");

        assert_eq!(app.log_text.lines().count(), before + 2);
        assert!(app.log_text.ends_with("first\nsecond\n"));
    }
}
