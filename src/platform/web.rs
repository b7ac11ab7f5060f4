//! Browser implementations of the platform capabilities

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use super::{FeedbackSink, SurfaceScaler};
use crate::renderer::palette::to_css;
use crate::renderer::{DrawCommand, Surface, TextAlign, TextBaseline};

/// Label of the hidden switch input in the host page. Toggling a switch is
/// the only way to get a haptic tick out of iOS Safari.
const IOS_HAPTIC_LABEL: &str = "label[for=\"ios-haptic-switch\"]";
const HAPTIC_PULSE_MS: u32 = 200;
const FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";

/// Vibration plus the iOS switch trick
pub struct WebFeedback {
    window: Window,
}

impl WebFeedback {
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl FeedbackSink for WebFeedback {
    fn hop(&mut self) {
        if let Some(document) = self.window.document() {
            if let Ok(Some(label)) = document.query_selector(IOS_HAPTIC_LABEL) {
                if let Ok(label) = label.dyn_into::<HtmlElement>() {
                    label.click();
                }
            }
        }
        let _ = self.window.navigator().vibrate_with_duration(HAPTIC_PULSE_MS);
    }
}

/// Reads `window.devicePixelRatio` every frame
pub struct WindowScaler {
    window: Window,
}

impl WindowScaler {
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl SurfaceScaler for WindowScaler {
    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

/// `<canvas>` with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("Canvas has no 2D context");
        }
        Self { canvas, ctx }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Viewport coordinates to canvas-local CSS pixels
    pub fn to_local(&self, client_x: f64, client_y: f64) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(
            (client_x - rect.left()) as f32,
            (client_y - rect.top()) as f32,
        )
    }

    fn set_font(ctx: &CanvasRenderingContext2d, size: f32, weight: u16) {
        ctx.set_font(&format!("{} {}px {}", weight, size.round(), FONT_FAMILY));
    }
}

impl Surface for CanvasSurface {
    fn is_usable(&self) -> bool {
        self.ctx.is_some()
    }

    fn css_size(&self) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(rect.width() as f32, rect.height() as f32)
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        }
    }

    fn draw(&mut self, command: &DrawCommand) {
        let Some(ctx) = &self.ctx else {
            return;
        };

        match command {
            DrawCommand::Clear { color } => {
                let size = self.css_size();
                ctx.set_fill_style_str(&to_css(*color));
                ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(&to_css(*color));
                ctx.fill();
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                line_width,
                color,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_line_width(*line_width as f64);
                ctx.set_stroke_style_str(&to_css(*color));
                ctx.stroke();
            }
            DrawCommand::Text {
                text,
                pos,
                style,
                color,
            } => {
                Self::set_font(ctx, style.size, style.weight);
                ctx.set_text_align(match style.align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_text_baseline(match style.baseline {
                    TextBaseline::Top => "top",
                    TextBaseline::Middle => "middle",
                });
                ctx.set_fill_style_str(&to_css(*color));
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
            DrawCommand::Glyph {
                glyph,
                pos,
                size,
                rotation,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha(*alpha as f64);
                let _ = ctx.translate(pos.x as f64, pos.y as f64);
                let _ = ctx.rotate(*rotation as f64);
                Self::set_font(ctx, *size, 400);
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(glyph, 0.0, 0.0);
                ctx.restore();
            }
        }
    }
}
