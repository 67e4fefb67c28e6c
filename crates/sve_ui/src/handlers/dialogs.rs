//! Modal message dialogs and the startup tool check.

use iced::Task;

use sve_core::media::{missing_tools, validate_tools, ToolStatus};

use crate::app::{App, Message};

/// Show a modal dialog; resolves to `DialogClosed`.
pub fn show_message(
    level: rfd::MessageLevel,
    title: impl Into<String>,
    description: impl Into<String>,
) -> Task<Message> {
    let title = title.into();
    let description = description.into();

    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::DialogClosed,
    )
}

pub fn show_error(title: impl Into<String>, description: impl Into<String>) -> Task<Message> {
    show_message(rfd::MessageLevel::Error, title, description)
}

pub fn show_info(title: impl Into<String>, description: impl Into<String>) -> Task<Message> {
    show_message(rfd::MessageLevel::Info, title, description)
}

impl App {
    /// Check for ffmpeg/ffprobe off the UI thread.
    pub fn check_tools(&self) -> Task<Message> {
        let tools = self.config.settings().tools.clone();
        Task::perform(async move { validate_tools(&tools) }, Message::ToolsChecked)
    }

    pub fn handle_tools_checked(&mut self, statuses: Vec<ToolStatus>) -> Task<Message> {
        for status in statuses.iter().filter(|s| s.is_available()) {
            if let Some(version) = &status.version {
                self.append_log(version);
            }
        }

        let missing = missing_tools(&statuses);
        if missing.is_empty() {
            return Task::none();
        }

        let list = missing.join(", ");
        self.append_log(&format!("Missing tool(s): {}", list));
        show_error(
            "Missing Tool",
            format!(
                "Could not run: {}\n\nInstall FFmpeg or set its location in the [tools] section of:\n{}",
                list,
                self.config.path().display()
            ),
        )
    }
}
