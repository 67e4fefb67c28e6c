//! External tool availability checks.

use std::process::{Command, Stdio};

use crate::config::ToolSettings;

/// Result of checking one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    pub command: String,
    /// First line of `-version` output when the tool ran.
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.version.is_some()
    }
}

/// Check that ffmpeg and ffprobe can be executed.
pub fn validate_tools(tools: &ToolSettings) -> Vec<ToolStatus> {
    vec![
        check_tool("ffmpeg", &tools.ffmpeg_path),
        check_tool("ffprobe", &tools.ffprobe_path),
    ]
}

/// Names of the tools that could not be run.
pub fn missing_tools(statuses: &[ToolStatus]) -> Vec<String> {
    statuses
        .iter()
        .filter(|s| !s.is_available())
        .map(|s| format!("{} ({})", s.name, s.command))
        .collect()
}

fn check_tool(name: &'static str, command: &str) -> ToolStatus {
    let version = Command::new(command)
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

    match &version {
        Some(v) => tracing::debug!("Found {}: {}", name, v),
        None => tracing::warn!("{} not available at '{}'", name, command),
    }

    ToolStatus {
        name,
        command: command.to_string(),
        version,
    }
}
