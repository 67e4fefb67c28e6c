//! Theme configuration for Simple Video Editor.
//!
//! Spacing and font sizes shared by all views, plus the few fixed colors.
//! Row and panel backgrounds come from the active iced palette.

use iced::Color;

pub mod colors {
    use super::Color;

    /// Secondary text (placeholders, hints)
    pub const TEXT_MUTED: Color = Color::from_rgb(0.53, 0.53, 0.53);

    /// Status text while an export runs
    pub const BUSY: Color = Color::from_rgb(0.85, 0.55, 0.10);
}

/// Spacing constants.
pub mod spacing {
    /// Extra small spacing (4px)
    pub const XS: f32 = 4.0;
    /// Small spacing (8px)
    pub const SM: f32 = 8.0;
    /// Medium spacing (12px)
    pub const MD: f32 = 12.0;
    /// Large spacing (16px)
    pub const LG: f32 = 16.0;
}

/// Font sizes.
pub mod font {
    pub const SM: f32 = 11.0;
    pub const NORMAL: f32 = 13.0;
    pub const LG: f32 = 15.0;
}

/// Width of the button column beside the clip list.
pub const SIDE_BUTTON_WIDTH: f32 = 130.0;

/// Height of the clip list.
pub const CLIP_LIST_HEIGHT: f32 = 140.0;
