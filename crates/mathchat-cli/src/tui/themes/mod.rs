//! Color theme for the TUI

use ratatui::style::Color;

/// Colors used across the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Core colors
    pub bg_color: Color,
    pub border_color: Color,
    pub title_color: Color,
    pub accent_color: Color,
    pub text_color: Color,
    pub dim_color: Color,

    // Special colors
    pub error_color: Color,
    pub code_bg_color: Color,
    pub link_color: Color,

    // Message role colors
    pub user_msg_color: Color,
    pub assistant_msg_color: Color,

    // Math
    pub math_color: Color,
    pub math_block_bg_color: Color,

    // Input & status
    pub input_border_color: Color,
    pub input_placeholder_color: Color,
    pub status_bar_bg_color: Color,
    pub processing_color: Color,
}

impl Default for Theme {
    /// Dark theme
    fn default() -> Self {
        Self {
            bg_color: Color::Rgb(24, 24, 37),
            border_color: Color::Rgb(88, 91, 112),
            title_color: Color::Rgb(139, 233, 253),
            accent_color: Color::Rgb(189, 147, 249),
            text_color: Color::Rgb(203, 213, 225),
            dim_color: Color::Rgb(148, 163, 184),
            error_color: Color::Rgb(255, 85, 85),
            code_bg_color: Color::Rgb(30, 30, 45),
            link_color: Color::Rgb(139, 233, 253),
            user_msg_color: Color::Rgb(80, 250, 123),
            assistant_msg_color: Color::Rgb(189, 147, 249),
            math_color: Color::Rgb(255, 203, 107),
            math_block_bg_color: Color::Rgb(30, 30, 45),
            input_border_color: Color::Rgb(88, 91, 112),
            input_placeholder_color: Color::Rgb(100, 116, 139),
            status_bar_bg_color: Color::Rgb(44, 44, 57),
            processing_color: Color::Rgb(255, 203, 107),
        }
    }
}
