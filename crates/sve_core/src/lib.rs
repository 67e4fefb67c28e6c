//! SVE Core - Backend logic for Simple Video Editor
//!
//! This crate contains all business logic with zero UI dependencies:
//! the playlist model, the export worker, and the FFmpeg media backend.
//! It can be used by the GUI application or a CLI tool.

pub mod config;
pub mod export;
pub mod logging;
pub mod media;
pub mod playlist;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
