//! Round state and core simulation types
//!
//! `RendererState` is owned and mutated only by the phase state machine;
//! the draw layer gets a shared borrow once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::confetti::ConfettiParticle;
use super::schedule::JumpStep;
use super::touches::{PointerId, TouchPoint, TouchRegistry};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Fewer than `min_players` fingers down
    #[default]
    WaitingForPlayers,
    /// Enough fingers down, counting to zero
    Countdown,
    /// Highlight jumping between players
    Suspense,
    /// Winner revealed; terminal until reset
    Result,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            GamePhase::Countdown => "COUNTDOWN",
            GamePhase::Suspense => "SUSPENSE",
            GamePhase::Result => "RESULT",
        }
    }

    /// New fingers only join before the selection starts
    pub fn accepts_new_touches(&self) -> bool {
        matches!(self, GamePhase::WaitingForPlayers | GamePhase::Countdown)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notifications emitted at transition points, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    CountdownTick(u32),
    /// Highlight moved to another player during suspense
    Hop { index: usize },
    Winner {
        winner_index: usize,
        player_count: usize,
    },
    NotEnoughPlayers {
        touch_count: usize,
        required: usize,
    },
}

/// Complete state of one game instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RendererState {
    pub phase: GamePhase,
    pub touches: TouchRegistry,
    /// Set while a countdown is running
    pub countdown_started_at: Option<f64>,
    /// Last seconds value reported to observers
    pub last_tick_second: Option<u32>,
    pub suspense_started_at: f64,
    pub suspense_schedule: Vec<JumpStep>,
    pub suspense_step_index: usize,
    pub current_highlight_index: usize,
    pub winner_index: usize,
    pub player_count: usize,
    /// Pointer ids frozen when the countdown ended; index space for the round
    pub snapshot_order: Vec<PointerId>,
    pub particles: Vec<ConfettiParticle>,
    pub particles_updated_at_ms: Option<f64>,
    /// Surface size in CSS pixels, as of the last drawn frame
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl RendererState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything scoped to a round. Surface size is kept.
    pub fn reset_round(&mut self) {
        *self = Self {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            ..Self::default()
        };
    }

    /// Touch of the player at `index` in the snapshot order, if still tracked
    pub fn player_touch(&self, index: usize) -> Option<&TouchPoint> {
        self.snapshot_order
            .get(index)
            .and_then(|id| self.touches.get(*id))
    }

    pub fn highlighted_touch(&self) -> Option<&TouchPoint> {
        self.player_touch(self.current_highlight_index)
    }

    /// Where the winner's finger was, or the middle of the surface
    pub fn winner_origin(&self) -> Vec2 {
        match self.player_touch(self.winner_index) {
            Some(touch) => touch.pos,
            None => Vec2::new(
                self.canvas_width.max(1.0) / 2.0,
                self.canvas_height.max(1.0) / 2.0,
            ),
        }
    }

    /// Seconds left on the countdown, or the full length when it is not running
    pub fn countdown_seconds_left(&self, now: f64, countdown_ms: f64) -> u32 {
        match self.countdown_started_at {
            Some(started_at) => seconds_left(countdown_ms, now - started_at),
            None => crate::full_countdown_seconds(countdown_ms),
        }
    }

    /// True once the winner's ring should be drawn as the final pick
    pub fn is_showing_winner(&self) -> bool {
        self.phase == GamePhase::Result && self.current_highlight_index == self.winner_index
    }
}

/// `ceil(max(0, countdown - elapsed) / 1000)`
pub fn seconds_left(countdown_ms: f64, elapsed_ms: f64) -> u32 {
    ((countdown_ms - elapsed_ms).max(0.0) / 1000.0).ceil() as u32
}
