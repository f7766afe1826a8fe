//! Input model: pointer events, modifier keys, tool state, and translation of
//! a local pointer interaction into a [`ShapeEvent`].
//!
//! Pointer events arrive in page coordinates. The surface's absolute page
//! position (its origin) is subtracted to get surface-relative coordinates.
//! Hosts that only know per-container offsets can build the origin with
//! [`Point::accumulate`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::{ShapeColor, ShapeEvent, ShapeType};
use serde::Deserialize;

use crate::geom::Point;

/// Keyboard modifier keys held during a pointer event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Discrete button press.
    Press,
    /// Pointer motion.
    Move,
}

/// A pointer interaction in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub page_x: f64,
    pub page_y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn press(page_x: f64, page_y: f64) -> Self {
        Self { kind: PointerKind::Press, page_x, page_y, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn moved(page_x: f64, page_y: f64, modifiers: Modifiers) -> Self {
        Self { kind: PointerKind::Move, page_x, page_y, modifiers }
    }

    #[must_use]
    pub fn page(&self) -> Point {
        Point::new(self.page_x, self.page_y)
    }

    /// Whether this interaction places a shape: presses always do, moves only
    /// while shift is held.
    #[must_use]
    pub fn places_shape(&self) -> bool {
        match self.kind {
            PointerKind::Press => true,
            PointerKind::Move => self.modifiers.shift,
        }
    }
}

/// The local drawing tool: which shape and color the next placement uses.
///
/// Never synchronized; every client keeps its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    pub shape_type: ShapeType,
    pub shape_color: ShapeColor,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { shape_type: ShapeType::BigCircle, shape_color: ShapeColor::Blue }
    }
}

impl ToolState {
    #[must_use]
    pub fn new(shape_type: ShapeType, shape_color: ShapeColor) -> Self {
        Self { shape_type, shape_color }
    }
}

/// Translate a pointer event into a shape placement at surface coordinates.
///
/// `origin` is the surface's top-left corner in page coordinates. Returns
/// `None` for interactions that do not place a shape.
#[must_use]
pub fn translate(event: &PointerEvent, origin: Point, tool: &ToolState) -> Option<ShapeEvent> {
    if !event.places_shape() {
        return None;
    }
    let local = event.page() - origin;
    Some(ShapeEvent::new(local.x, local.y, tool.shape_color.clone(), tool.shape_type.clone()))
}
