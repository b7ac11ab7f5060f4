//! Colors for game elements

use super::surface::Color;

/// Build an opaque color from 0xRRGGBB
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with its alpha scaled
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Player circle colors, assigned by render order
pub const PLAYER_COLORS: [Color; 8] = [
    rgb(0xf97316), // orange
    rgb(0x3b82f6), // blue
    rgb(0xeab308), // yellow
    rgb(0xec4899), // pink
    rgb(0x22c55e), // green
    rgb(0x8b5cf6), // violet
    rgb(0x06b6d4), // cyan
    rgb(0xef4444), // red
];

pub const BACKGROUND: Color = rgb(0xffffff);
pub const INK: Color = rgb(0x0f172a);
pub const WINNER_RING: Color = rgb(0x16a34a);

/// Alpha applied to circles whose finger has been lifted
pub const FROZEN_ALPHA: f32 = 0.7;

pub fn player_color(render_index: usize) -> Color {
    PLAYER_COLORS[render_index % PLAYER_COLORS.len()]
}

/// CSS `rgba()` string for canvas fill/stroke styles
pub fn to_css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
