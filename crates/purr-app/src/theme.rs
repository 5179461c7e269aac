use ratatui::style::Color;

pub const ACCENT: Color = Color::Magenta;
pub const HEADER_FG: Color = Color::White;
pub const STATUS_BG: Color = Color::Rgb(30, 30, 46);
pub const STATUS_FG: Color = Color::Gray;
pub const TEXT_DIM: Color = Color::DarkGray;
pub const OVERLAY_BG: Color = Color::Rgb(24, 24, 37);
pub const SELECTION_BG: Color = Color::Rgb(69, 71, 90);
pub const STATUS_RUNNING: Color = Color::Green;
pub const STATUS_PENDING: Color = Color::Yellow;
pub const STATUS_FAILED: Color = Color::Red;
pub const BORDER_COLOR: Color = Color::Rgb(88, 91, 112);
