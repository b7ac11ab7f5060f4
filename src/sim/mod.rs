//! Deterministic round simulation
//!
//! All selection logic lives here. This module must stay pure and headless:
//! - Time comes in as a timestamp argument, never from a clock
//! - Seeded RNG only, passed in by the caller
//! - Stable iteration order (touches in the order they went down)
//! - No rendering or platform dependencies

pub mod confetti;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod touches;
pub mod winner;

pub use confetti::{ConfettiLayer, ConfettiParticle, ConfettiStep, advance_confetti, spawn_confetti};
pub use schedule::{JumpStep, build_suspense_schedule, schedule_end_ms};
pub use state::{GameEvent, GamePhase, RendererState, seconds_left};
pub use tick::{RoundRules, tick, update_confetti};
pub use touches::{PointerId, TouchPoint, TouchRegistry};
pub use winner::pick_winner_index;
