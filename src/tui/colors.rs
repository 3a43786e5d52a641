//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Status labels and the focused input border
pub const ACCENT_BLUE: Color = Color::Rgb(0, 123, 255);
/// Delete confirmation
pub const DANGER_RED: Color = Color::Rgb(255, 59, 48);
/// Save action in the edit modal
pub const SAVE_GREEN: Color = Color::Rgb(40, 167, 69);
/// Cancel action and completed rows
pub const MUTED_GREY: Color = Color::Rgb(108, 117, 125);
