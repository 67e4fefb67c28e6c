//! File picker handlers.

use iced::Task;

use crate::app::{App, FolderType, Message};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

/// Default name offered in the save dialog.
const DEFAULT_OUTPUT_NAME: &str = "output.mp4";

impl App {
    /// Pick one or more clips to append.
    pub fn browse_clips(&self) -> Task<Message> {
        if !self.is_idle() {
            return Task::none();
        }
        let start_dir = self.last_folder(FolderType::Clips);

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Select Video Clips")
                    .add_filter("Video Files", VIDEO_EXTENSIONS)
                    .add_filter("All Files", &["*"]);
                if let Some(dir) = start_dir {
                    dialog = dialog.set_directory(dir);
                }
                dialog
                    .pick_files()
                    .await
                    .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
            },
            Message::ClipsPicked,
        )
    }

    /// Pick the background music file.
    pub fn browse_music(&self) -> Task<Message> {
        if !self.is_idle() {
            return Task::none();
        }
        let start_dir = self.last_folder(FolderType::Audio);

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Select Background Music")
                    .add_filter("Audio Files", AUDIO_EXTENSIONS)
                    .add_filter("All Files", &["*"]);
                if let Some(dir) = start_dir {
                    dialog = dialog.set_directory(dir);
                }
                dialog.pick_file().await.map(|f| f.path().to_path_buf())
            },
            Message::MusicPicked,
        )
    }

    /// Ask where to save the exported video.
    pub fn browse_destination(&self) -> Task<Message> {
        let start_dir = self.last_folder(FolderType::Export);

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Save Video As")
                    .add_filter("MP4 Video", &["mp4"])
                    .set_file_name(DEFAULT_OUTPUT_NAME);
                if let Some(dir) = start_dir {
                    dialog = dialog.set_directory(dir);
                }
                dialog.save_file().await.map(|f| f.path().to_path_buf())
            },
            Message::DestinationPicked,
        )
    }
}
