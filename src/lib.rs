//! Who Pays - a multi-touch "decide who pays" party game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (touches, countdown, suspense, confetti)
//! - `renderer`: 2D draw layer over an abstract surface
//! - `platform`: Browser capabilities (haptics, pixel ratio, canvas)
//! - `config`: Game options and validation
//! - `game`: The handle that ties input, simulation and drawing together

pub mod config;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameOptions};
pub use game::{Game, GameCallbacks};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default countdown length once enough fingers are down
    pub const DEFAULT_COUNTDOWN_MS: f64 = 5000.0;
    /// Default minimum number of touches before the countdown starts
    pub const DEFAULT_MIN_PLAYERS: usize = 2;

    /// Touch circle radius as a fraction of the short side of the surface
    pub const TOUCH_CIRCLE_SCALE: f32 = 0.12;
    /// Gap between a touch circle and its "active" ring during countdown
    pub const ACTIVE_RING_OFFSET: f32 = 8.0;
    /// Gap between a touch circle and the suspense highlight ring
    pub const HIGHLIGHT_RING_OFFSET: f32 = 12.0;

    /// Default number of hops in the suspense animation
    pub const DEFAULT_HOP_COUNT: usize = 16;
    /// Dwell after the last scheduled hop before the result is revealed
    pub const SUSPENSE_END_BUFFER_MS: f64 = 420.0;
}

/// Number of whole seconds shown for a countdown of `countdown_ms`
#[inline]
pub fn full_countdown_seconds(countdown_ms: f64) -> u32 {
    (countdown_ms / 1000.0).ceil().max(0.0) as u32
}

/// Radius of a touch circle for a surface of the given CSS size
#[inline]
pub fn touch_circle_radius(width: f32, height: f32) -> f32 {
    width.min(height) * consts::TOUCH_CIRCLE_SCALE
}
