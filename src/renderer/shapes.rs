//! Scene generation: turns round state into draw commands

use glam::Vec2;

use super::palette::{self, FROZEN_ALPHA, INK, WINNER_RING, with_alpha};
use super::surface::{DrawCommand, TextAlign, TextBaseline, TextStyle};
use crate::consts::{ACTIVE_RING_OFFSET, HIGHLIGHT_RING_OFFSET};
use crate::sim::{ConfettiLayer, ConfettiParticle, GamePhase, RendererState};
use crate::touch_circle_radius;

/// Flying money
pub const CASH_GLYPH: &str = "\u{1F4B8}";

pub const WAITING_TEXT: &str = "Hold a finger on the screen";

const LABEL_MARGIN: f32 = 16.0;
const COUNTDOWN_FONT_SCALE: f32 = 0.3;
/// Extra size of the countdown digit right as a new second starts
const COUNTDOWN_PULSE: f32 = 0.18;
const ACTIVE_RING_WIDTH: f32 = 3.0;
const HIGHLIGHT_RING_WIDTH: f32 = 6.0;
const WINNER_RING_WIDTH: f32 = 8.0;

/// How the countdown scene should look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownView {
    pub countdown_ms: f64,
    /// Scale the digit with the sub-second fraction
    pub pulse: bool,
}

/// Waiting / countdown: every touch with its ring, plus the center text
pub fn countdown_scene(
    state: &RendererState,
    size: Vec2,
    now: f64,
    view: CountdownView,
) -> Vec<DrawCommand> {
    let radius = touch_circle_radius(size.x, size.y);
    let mut commands = Vec::with_capacity(state.touches.len() * 2 + 2);

    for (i, (_, touch)) in state.touches.iter().enumerate() {
        commands.push(DrawCommand::FillCircle {
            center: touch.pos,
            radius,
            color: palette::player_color(i),
        });
        commands.push(DrawCommand::StrokeCircle {
            center: touch.pos,
            radius: radius + ACTIVE_RING_OFFSET,
            line_width: ACTIVE_RING_WIDTH,
            color: INK,
        });
    }

    let center = size / 2.0;
    if state.phase == GamePhase::WaitingForPlayers {
        commands.push(DrawCommand::Text {
            text: WAITING_TEXT.to_string(),
            pos: center,
            style: TextStyle {
                size: (size.x.min(size.y) * 0.06).max(18.0),
                weight: 600,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
            color: INK,
        });
    } else {
        let secs = state.countdown_seconds_left(now, view.countdown_ms);
        let base = size.x.min(size.y) * COUNTDOWN_FONT_SCALE;
        let scale = if view.pulse {
            1.0 + COUNTDOWN_PULSE * second_fraction(state, now, view.countdown_ms).powi(2)
        } else {
            1.0
        };
        commands.push(DrawCommand::Text {
            text: secs.to_string(),
            pos: center,
            style: TextStyle {
                size: base * scale,
                weight: 700,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
            color: INK,
        });
    }

    commands.push(corner_label(player_count_label(state.touches.len()), 600));
    commands
}

/// Suspense / result: circles, confetti behind and in front of the highlight
pub fn suspense_scene(state: &RendererState, size: Vec2, now: f64) -> Vec<DrawCommand> {
    let radius = touch_circle_radius(size.x, size.y);
    let highlighted_id = state.snapshot_order.get(state.current_highlight_index).copied();
    let mut commands = Vec::with_capacity(state.touches.len() + state.particles.len() + 3);
    let mut highlighted = None;

    for (i, (id, touch)) in state.touches.iter().enumerate() {
        let color = palette::player_color(i);
        let color = if touch.frozen { with_alpha(color, FROZEN_ALPHA) } else { color };
        // Drawn after the back confetti, so it sits above any overlapping neighbour
        if Some(id) == highlighted_id {
            highlighted = Some((touch.pos, color));
            continue;
        }
        commands.push(DrawCommand::FillCircle {
            center: touch.pos,
            radius,
            color,
        });
    }

    let show_confetti = state.phase == GamePhase::Result;
    if show_confetti {
        commands.extend(confetti_layer(&state.particles, now, ConfettiLayer::Back));
    }

    if let Some((center, color)) = highlighted {
        let (ring_color, line_width) = if state.is_showing_winner() {
            (WINNER_RING, WINNER_RING_WIDTH)
        } else {
            (INK, HIGHLIGHT_RING_WIDTH)
        };
        commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
        commands.push(DrawCommand::StrokeCircle {
            center,
            radius: radius + HIGHLIGHT_RING_OFFSET,
            line_width,
            color: ring_color,
        });
    }

    if show_confetti {
        commands.extend(confetti_layer(&state.particles, now, ConfettiLayer::Front));
    }

    let status = if state.phase == GamePhase::Result {
        format!("Player {} wins!", state.winner_index + 1)
    } else {
        "Selecting...".to_string()
    };
    commands.push(corner_label(status, 400));
    commands
}

/// Glyphs for the living particles of one layer
pub fn confetti_layer(
    particles: &[ConfettiParticle],
    now: f64,
    layer: ConfettiLayer,
) -> impl Iterator<Item = DrawCommand> + '_ {
    particles
        .iter()
        .filter(move |p| p.layer == layer)
        .filter(move |p| {
            let age = p.age_ms(now);
            age > 0.0 && age < p.lifetime_ms
        })
        .filter_map(move |p| {
            let alpha = p.opacity(now);
            (alpha > 0.0).then_some(DrawCommand::Glyph {
                glyph: CASH_GLYPH,
                pos: p.pos,
                size: p.size,
                rotation: p.rotation,
                alpha,
            })
        })
}

fn player_count_label(count: usize) -> String {
    if count == 1 {
        "1 player".to_string()
    } else {
        format!("{} players", count)
    }
}

fn corner_label(text: String, weight: u16) -> DrawCommand {
    DrawCommand::Text {
        text,
        pos: Vec2::splat(LABEL_MARGIN),
        style: TextStyle {
            size: 16.0,
            weight,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        },
        color: INK,
    }
}

/// Fraction of the current second still to go (1 just after a tick, 0 right before the next)
fn second_fraction(state: &RendererState, now: f64, countdown_ms: f64) -> f32 {
    let Some(started_at) = state.countdown_started_at else {
        return 0.0;
    };
    let remaining = (countdown_ms - (now - started_at)).max(0.0);
    if remaining <= 0.0 {
        return 0.0;
    }
    let into_second = remaining % 1000.0;
    let fraction = if into_second == 0.0 { 1.0 } else { into_second / 1000.0 };
    fraction as f32
}
