//! Clip list and music slot handlers.

use std::path::PathBuf;

use sve_core::playlist::{display_name, PlaylistError};

use crate::app::{App, FolderType};

impl App {
    /// Handle clips chosen in the picker. `None` means cancelled.
    pub fn handle_clips_picked(&mut self, paths: Option<Vec<PathBuf>>) {
        let Some(paths) = paths.filter(|p| !p.is_empty()) else {
            return;
        };
        if !self.is_idle() {
            return;
        }

        if let Some(first) = paths.first() {
            self.remember_folder(FolderType::Clips, first);
        }
        for path in &paths {
            self.append_log(&format!("Clip added: {}", path.display()));
        }

        let added = self.playlist.add_clips(paths);
        self.set_status(format!("{} clip(s) added.", added));
    }

    /// Append a file dropped onto the window.
    pub fn handle_file_dropped(&mut self, path: PathBuf) {
        if !self.is_idle() {
            tracing::debug!("Ignoring dropped file while exporting: {}", path.display());
            return;
        }
        if path.is_dir() {
            self.append_log(&format!("Ignored dropped folder: {}", path.display()));
            return;
        }
        self.handle_clips_picked(Some(vec![path]));
    }

    pub fn handle_select_clip(&mut self, idx: usize) {
        if self.is_idle() && idx < self.playlist.len() {
            self.selected = Some(idx);
        }
    }

    pub fn handle_remove_selected(&mut self) {
        if !self.is_idle() {
            return;
        }
        match self.playlist.remove_at(self.selected) {
            Ok(removed) => {
                self.selected = None;
                let name = display_name(&removed);
                self.append_log(&format!("Clip removed: {}", removed.display()));
                self.set_status(format!("Removed: {}", name));
            }
            Err(PlaylistError::NothingSelected) => self.set_status("No clip selected to remove."),
        }
    }

    pub fn handle_move_up(&mut self) {
        if !self.is_idle() {
            return;
        }
        let moved = self.playlist.move_up(self.selected);
        self.apply_move(moved);
    }

    pub fn handle_move_down(&mut self) {
        if !self.is_idle() {
            return;
        }
        let moved = self.playlist.move_down(self.selected);
        self.apply_move(moved);
    }

    fn apply_move(&mut self, moved: Result<usize, PlaylistError>) {
        match moved {
            Ok(new_idx) => self.selected = Some(new_idx),
            Err(PlaylistError::NothingSelected) => self.set_status("No clip selected to move."),
        }
    }

    /// Handle music chosen in the picker. `None` means cancelled.
    pub fn handle_music_picked(&mut self, path: Option<PathBuf>) {
        let Some(path) = path else {
            return;
        };
        if !self.is_idle() {
            return;
        }

        self.remember_folder(FolderType::Audio, &path);
        let name = display_name(&path);
        self.append_log(&format!("Music set: {}", path.display()));
        self.playlist.set_audio(path);
        self.set_status(format!("Added music: {}", name));
    }

    pub fn handle_remove_music(&mut self) {
        if !self.is_idle() {
            return;
        }
        self.playlist.clear_audio();
        self.set_status("Music removed.");
    }
}
