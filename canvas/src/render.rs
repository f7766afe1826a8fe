//! Rendering: paints one shape event onto a [`Surface`].
//!
//! This module keeps no state between calls. Everything it reads comes from
//! the shape event and everything it writes goes into the surface passed in,
//! so replaying the same events onto a cleared surface reproduces the same
//! pixels.
//!
//! Unknown shape types are acknowledged and skipped so that peers running a
//! newer protocol revision can introduce shapes without breaking this client.

use frames::{ShapeColor, ShapeEvent, ShapeType};

use crate::consts::RADIUS;
use crate::surface::{Rgba, Surface};

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

/// Draw a single shape. Returns `false` when the shape type is unknown and
/// nothing was drawn.
pub fn render(surface: &mut Surface, shape: &ShapeEvent) -> bool {
    let fill = resolve_color(&shape.color).unwrap_or(surface.default_fill());

    match shape.kind {
        ShapeType::SmallCircle => surface.fill_circle(shape.x, shape.y, RADIUS, fill),
        ShapeType::BigCircle => surface.fill_circle(shape.x, shape.y, 2.0 * RADIUS, fill),
        ShapeType::BigSquare => fill_centered_square(surface, shape, 4.0 * RADIUS, fill),
        ShapeType::SmallSquare => fill_centered_square(surface, shape, 2.0 * RADIUS, fill),
        ShapeType::Other(_) => return false,
    }
    true
}

/// Draw a sequence of shapes in order. Returns how many were drawn.
pub fn render_all<'a, I>(surface: &mut Surface, shapes: I) -> usize
where
    I: IntoIterator<Item = &'a ShapeEvent>,
{
    shapes
        .into_iter()
        .filter(|shape| render(surface, shape))
        .count()
}

/// Concrete color for a symbolic tag, or `None` if the tag is not recognized.
#[must_use]
pub fn resolve_color(color: &ShapeColor) -> Option<Rgba> {
    match color {
        ShapeColor::Black => Some(Rgba::opaque(0, 0, 0)),
        ShapeColor::Blue => Some(Rgba::opaque(0, 0, 255)),
        ShapeColor::Green => Some(Rgba::opaque(0, 128, 0)),
        ShapeColor::Red => Some(Rgba::opaque(255, 0, 0)),
        ShapeColor::Yellow => Some(Rgba::opaque(255, 255, 0)),
        ShapeColor::Other(_) => None,
    }
}

fn fill_centered_square(surface: &mut Surface, shape: &ShapeEvent, side: f64, fill: Rgba) {
    let half = side / 2.0;
    surface.fill_rect(shape.x - half, shape.y - half, side, side, fill);
}
