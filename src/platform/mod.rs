//! Platform abstraction layer
//!
//! Browser-coupled side effects sit behind small capability traits so the
//! game runs headless in tests and on native:
//! - Haptic feedback on suspense hops (`FeedbackSink`)
//! - Device pixel ratio (`SurfaceScaler`)
//! - The 2D canvas itself (`web::CanvasSurface`, wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

/// Receives one pulse per suspense hop
pub trait FeedbackSink {
    fn hop(&mut self);
}

/// Feedback sink that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn hop(&mut self) {}
}

/// Counts pulses. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct CountingFeedback {
    hops: Rc<Cell<u32>>,
}

impl CountingFeedback {
    pub fn count(&self) -> u32 {
        self.hops.get()
    }
}

impl FeedbackSink for CountingFeedback {
    fn hop(&mut self) {
        self.hops.set(self.hops.get() + 1);
    }
}

/// Source of the device pixel ratio
pub trait SurfaceScaler {
    fn device_pixel_ratio(&self) -> f64;
}

/// Constant pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScaler(pub f64);

impl Default for FixedScaler {
    fn default() -> Self {
        Self(1.0)
    }
}

impl SurfaceScaler for FixedScaler {
    fn device_pixel_ratio(&self) -> f64 {
        self.0
    }
}

/// Seed from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
