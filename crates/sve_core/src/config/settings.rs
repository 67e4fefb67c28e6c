//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::manager::project_dirs;
use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,
}

/// Config sections that can be updated on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Tools,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 3] = [Self::Paths, Self::Logging, Self::Tools];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Logging => "logging",
            Self::Tools => "tools",
        }
    }

    /// Comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            Self::Paths => "# Log folder and last-used dialog folders",
            Self::Logging => "# Logging configuration",
            Self::Tools => "# FFmpeg executables (name on PATH or absolute path)",
        }
    }
}

/// Path configuration for logs and remembered dialog folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for application and export log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Folder the clip picker last opened in.
    #[serde(default)]
    pub last_clip_folder: String,

    /// Folder the music picker last opened in.
    #[serde(default)]
    pub last_audio_folder: String,

    /// Folder the last export was saved to.
    #[serde(default)]
    pub last_export_folder: String,
}

/// `logs` under the platform data directory, or `.logs` when there is none.
fn default_logs_folder() -> String {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(".logs"))
        .to_string_lossy()
        .into_owned()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
            last_clip_folder: String::new(),
            last_audio_folder: String::new(),
            last_export_folder: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep FFmpeg output in the tail buffer only.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of FFmpeg output lines kept for error reports.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Write application and export logs to the logs folder.
    #[serde(default = "default_true")]
    pub file_logging: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            error_tail: default_error_tail(),
            file_logging: true,
        }
    }
}

/// Locations of the FFmpeg executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_get_defaults() {
        let settings: Settings = toml::from_str("[paths]\nlogs_folder = \"logs\"\n").unwrap();

        assert_eq!(settings.paths.logs_folder, "logs");
        assert!(settings.paths.last_clip_folder.is_empty());
        assert_eq!(settings.logging.error_tail, 20);
        assert_eq!(settings.tools.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn default_logs_folder_follows_data_dir() {
        let logs = PathBuf::from(PathSettings::default().logs_folder);

        match project_dirs() {
            Some(dirs) => {
                assert_eq!(logs, dirs.data_dir().join("logs"));
                assert!(logs.is_absolute());
            }
            None => assert_eq!(logs, PathBuf::from(".logs")),
        }
    }

    #[test]
    fn log_level_reads_lowercase() {
        let settings: Settings = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(settings.logging.level, LogLevel::Debug);
    }
}
