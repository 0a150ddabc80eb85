use ratatui::style::Color;

/// Errors and failed moves
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 111, 146);
/// Successful sorts and navigation hints
pub const ACCENT_SECONDARY: Color = Color::Rgb(156, 207, 216);
/// Titles and bucket digits
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(246, 193, 119);

pub const TEXT_PRIMARY: Color = Color::Rgb(224, 222, 244);
pub const TEXT_SECONDARY: Color = Color::Rgb(144, 140, 170);

pub const BORDER_COLOR: Color = Color::Rgb(82, 79, 103);
pub const BG_DARK: Color = Color::Rgb(25, 23, 36);
