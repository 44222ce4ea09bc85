//! Layout constants and the chart palette.

use iced::Color;

/// Spacing scale used across the layout.
pub mod spacing {
    pub const XS: u16 = 4;
    pub const SM: u16 = 8;
    pub const MD: u16 = 16;
    pub const LG: u16 = 24;
}

/// Font sizes.
pub mod font {
    pub const SM: u16 = 12;
    pub const NORMAL: u16 = 14;
    pub const LG: u16 = 18;
}

/// Named series colors for the chart renderer.
pub mod palette {
    use super::Color;

    pub const RED: Color = Color::from_rgb(0.86, 0.20, 0.18);
    pub const GREEN: Color = Color::from_rgb(0.18, 0.62, 0.29);
    pub const BLUE: Color = Color::from_rgb(0.17, 0.38, 0.80);
    pub const BLACK: Color = Color::from_rgb(0.10, 0.10, 0.10);

    /// Cycled for series that don't pin a color.
    pub const AUTO: [Color; 4] = [
        Color::from_rgb(0.22, 0.49, 0.85),
        Color::from_rgb(0.91, 0.47, 0.14),
        Color::from_rgb(0.25, 0.66, 0.40),
        Color::from_rgb(0.73, 0.26, 0.67),
    ];

    pub const AXIS: Color = Color::from_rgb(0.45, 0.45, 0.45);
    pub const GRID: Color = Color::from_rgb(0.88, 0.88, 0.88);
    pub const LABEL: Color = Color::from_rgb(0.25, 0.25, 0.25);
}
