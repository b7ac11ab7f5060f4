//! 2D drawing target abstraction
//!
//! The draw layer never talks to a canvas directly. It produces a list of
//! `DrawCommand`s and hands them to a `Surface`, which on the web is a
//! `CanvasRenderingContext2d` and in tests is a `RecordingSurface`.

use glam::Vec2;

/// RGBA, each channel 0-1
pub type Color = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

/// Font for a text command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel size
    pub size: f32,
    /// CSS weight (400 regular, 600 semibold, 700 bold)
    pub weight: u16,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// One drawing primitive, in CSS pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Color },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        line_width: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
        color: Color,
    },
    /// An emoji glyph, centered on `pos` and rotated around it
    Glyph {
        glyph: &'static str,
        pos: Vec2,
        size: f32,
        rotation: f32,
        alpha: f32,
    },
}

/// A resizable 2D drawing target
pub trait Surface {
    /// False when there is no usable drawing context
    fn is_usable(&self) -> bool {
        true
    }

    /// Size of the element on screen, in CSS pixels
    fn css_size(&self) -> Vec2;

    /// Size of the backing store in device pixels
    fn backing_size(&self) -> (u32, u32);

    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Scale so that drawing in CSS pixels fills the backing store
    fn set_pixel_ratio(&mut self, ratio: f64);

    fn draw(&mut self, command: &DrawCommand);
}

/// In-memory surface that keeps the commands of the last frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub css_size: Vec2,
    pub backing_size: (u32, u32),
    pub pixel_ratio: f64,
    pub usable: bool,
    /// Commands since the last `Clear`
    pub commands: Vec<DrawCommand>,
    /// Number of times the backing store was resized
    pub resize_count: u32,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            css_size: Vec2::new(width, height),
            backing_size: (0, 0),
            pixel_ratio: 1.0,
            usable: true,
            commands: Vec::new(),
            resize_count: 0,
        }
    }

    /// A surface whose drawing context could not be obtained
    pub fn unusable() -> Self {
        Self {
            usable: false,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    pub fn glyph_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glyph { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn is_usable(&self) -> bool {
        self.usable
    }

    fn css_size(&self) -> Vec2 {
        self.css_size
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing_size = (width, height);
        self.resize_count += 1;
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn draw(&mut self, command: &DrawCommand) {
        if matches!(command, DrawCommand::Clear { .. }) {
            self.commands.clear();
        }
        self.commands.push(command.clone());
    }
}
