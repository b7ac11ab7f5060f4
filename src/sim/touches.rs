//! Touch registry
//!
//! Maps hardware pointer identifiers to logical touch state. Every operation
//! is tolerant of stray, duplicate or out-of-order pointer events: anything
//! that does not apply is silently ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// Stable per-contact identifier (`PointerEvent.pointerId`)
pub type PointerId = i32;

/// One active contact point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Last known position in surface-local pixels
    pub pos: Vec2,
    /// Lifted during suspense; keeps its last position and ignores moves
    pub frozen: bool,
}

impl TouchPoint {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, frozen: false }
    }
}

/// Active touches, kept in the order they went down
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TouchRegistry {
    entries: Vec<(PointerId, TouchPoint)>,
}

impl TouchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new contact. Returns false if it was rejected.
    pub fn add(&mut self, phase: GamePhase, id: PointerId, pos: Vec2) -> bool {
        if !phase.accepts_new_touches() || self.contains(id) {
            return false;
        }
        self.entries.push((id, TouchPoint::new(pos)));
        true
    }

    /// Track movement of a contact (frozen or unknown contacts are ignored)
    pub fn update(&mut self, id: PointerId, pos: Vec2) {
        if let Some(touch) = self.get_mut(id) {
            if !touch.frozen {
                touch.pos = pos;
            }
        }
    }

    /// Handle a lifted (or cancelled) contact according to the current phase
    pub fn release(&mut self, phase: GamePhase, id: PointerId) {
        match phase {
            GamePhase::WaitingForPlayers | GamePhase::Countdown => {
                self.entries.retain(|(touch_id, _)| *touch_id != id);
            }
            GamePhase::Suspense => {
                if let Some(touch) = self.get_mut(id) {
                    touch.frozen = true;
                }
            }
            GamePhase::Result => {}
        }
    }

    pub fn get(&self, id: PointerId) -> Option<&TouchPoint> {
        self.entries
            .iter()
            .find(|(touch_id, _)| *touch_id == id)
            .map(|(_, touch)| touch)
    }

    fn get_mut(&mut self, id: PointerId) -> Option<&mut TouchPoint> {
        self.entries
            .iter_mut()
            .find(|(touch_id, _)| *touch_id == id)
            .map(|(_, touch)| touch)
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in render order
    pub fn ids(&self) -> Vec<PointerId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Touches in render order
    pub fn iter(&self) -> impl Iterator<Item = (PointerId, &TouchPoint)> {
        self.entries.iter().map(|(id, touch)| (*id, touch))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
