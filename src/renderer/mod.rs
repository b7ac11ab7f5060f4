//! Canvas rendering module
//!
//! Builds draw commands from the round state and sends them to a `Surface`.

pub mod palette;
pub mod shapes;
pub mod surface;

use glam::Vec2;

pub use shapes::CountdownView;
pub use surface::{Color, DrawCommand, RecordingSurface, Surface, TextAlign, TextBaseline, TextStyle};

use crate::sim::{GamePhase, RendererState};

/// Stateless per-frame drawer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    pub countdown_ms: f64,
    pub reduced_motion: bool,
}

impl Renderer {
    pub fn new(countdown_ms: f64) -> Self {
        Self {
            countdown_ms,
            reduced_motion: false,
        }
    }

    /// Match the backing store to the element size. Only touches the
    /// backing store when the target size actually changed.
    pub fn resize<S: Surface>(&self, surface: &mut S, device_pixel_ratio: f64) -> Vec2 {
        let css = surface.css_size();
        let css = Vec2::new(css.x.floor().max(1.0), css.y.floor().max(1.0));
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let target = (
            (css.x as f64 * dpr).floor() as u32,
            (css.y as f64 * dpr).floor() as u32,
        );

        if surface.backing_size() != target {
            log::debug!("Resizing backing store to {}x{}", target.0, target.1);
            surface.set_backing_size(target.0, target.1);
        }
        surface.set_pixel_ratio(dpr);
        css
    }

    /// Draw one frame; returns the CSS size it was drawn at
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        state: &RendererState,
        now: f64,
        device_pixel_ratio: f64,
    ) -> Vec2 {
        let size = self.resize(surface, device_pixel_ratio);
        surface.draw(&DrawCommand::Clear {
            color: palette::BACKGROUND,
        });

        let commands = match state.phase {
            GamePhase::WaitingForPlayers | GamePhase::Countdown => shapes::countdown_scene(
                state,
                size,
                now,
                CountdownView {
                    countdown_ms: self.countdown_ms,
                    pulse: !self.reduced_motion,
                },
            ),
            GamePhase::Suspense | GamePhase::Result => shapes::suspense_scene(state, size, now),
        };
        for command in &commands {
            surface.draw(command);
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_only_on_change() {
        let renderer = Renderer::new(5000.0);
        let mut surface = RecordingSurface::new(300.7, 200.2);

        let size = renderer.resize(&mut surface, 2.0);
        assert_eq!(size, Vec2::new(300.0, 200.0));
        assert_eq!(surface.backing_size, (600, 400));
        assert_eq!(surface.pixel_ratio, 2.0);
        assert_eq!(surface.resize_count, 1);

        renderer.resize(&mut surface, 2.0);
        assert_eq!(surface.resize_count, 1);

        renderer.resize(&mut surface, 1.5);
        assert_eq!(surface.backing_size, (450, 300));
        assert_eq!(surface.resize_count, 2);
    }

    #[test]
    fn test_zero_sized_element_clamps_to_one() {
        let renderer = Renderer::new(5000.0);
        let mut surface = RecordingSurface::new(0.0, 0.0);
        let size = renderer.resize(&mut surface, 3.0);
        assert_eq!(size, Vec2::ONE);
        assert_eq!(surface.backing_size, (3, 3));
    }

    #[test]
    fn test_bad_pixel_ratio_falls_back() {
        let renderer = Renderer::new(5000.0);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        renderer.resize(&mut surface, f64::NAN);
        assert_eq!(surface.backing_size, (100, 100));
        assert_eq!(surface.pixel_ratio, 1.0);
    }

    #[test]
    fn test_render_clears_first() {
        let renderer = Renderer::new(5000.0);
        let mut surface = RecordingSurface::new(400.0, 400.0);
        let state = RendererState::new();
        renderer.render(&mut surface, &state, 0.0, 1.0);
        renderer.render(&mut surface, &state, 16.0, 1.0);

        assert_eq!(
            surface.commands[0],
            DrawCommand::Clear {
                color: palette::BACKGROUND
            }
        );
        assert_eq!(surface.texts(), vec![shapes::WAITING_TEXT, "0 players"]);
    }

    #[test]
    fn test_reduced_motion_keeps_digit_steady() {
        let mut renderer = Renderer::new(5000.0);
        renderer.reduced_motion = true;
        let mut state = RendererState::new();
        state.phase = GamePhase::Countdown;
        state.countdown_started_at = Some(0.0);

        let mut surface = RecordingSurface::new(400.0, 400.0);
        let digit_size = |surface: &RecordingSurface| {
            surface
                .commands
                .iter()
                .find_map(|c| match c {
                    DrawCommand::Text { text, style, .. } if text != "0 players" => Some(style.size),
                    _ => None,
                })
                .unwrap()
        };
        renderer.render(&mut surface, &state, 10.0, 1.0);
        let early = digit_size(&surface);
        renderer.render(&mut surface, &state, 900.0, 1.0);
        assert_eq!(early, digit_size(&surface));
    }
}
