//! Surface: an owned RGBA pixel buffer the renderer paints onto.
//!
//! Primitives follow a pixel-center sampling rule: a pixel is painted when its
//! center `(col + 0.5, row + 0.5)` falls inside the shape, with the far edge
//! of every span exclusive. Everything is clipped to the surface bounds, so
//! shapes partly or fully off-surface are safe to draw.

use std::ops::Range;

use crate::consts::PIXEL_CENTER;

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

/// An 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    /// A fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A fixed-size 2D drawing target.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    background: Rgba,
    default_fill: Rgba,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Create a transparent surface whose default fill is opaque black.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            background: Rgba::TRANSPARENT,
            default_fill: Rgba::BLACK,
            pixels: vec![Rgba::TRANSPARENT; len],
        }
    }

    /// Replace the background and repaint the whole surface with it.
    #[must_use]
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self.clear();
        self
    }

    /// Replace the fill used for colors the renderer cannot resolve.
    #[must_use]
    pub fn with_default_fill(mut self, fill: Rgba) -> Self {
        self.default_fill = fill;
        self
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    #[must_use]
    pub fn default_fill(&self) -> Rgba {
        self.default_fill
    }

    /// Color at `(col, row)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, col: u32, row: u32) -> Option<Rgba> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.pixels.get(self.index(col, row)).copied()
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Number of pixels that differ from the background.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p != self.background).count()
    }

    /// Reset every pixel to the background.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Fill the axis-aligned rectangle with top-left `(x, y)`.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        let cols = pixel_span(x, x + width, self.width);
        for row in pixel_span(y, y + height, self.height) {
            self.fill_row(row, cols.clone(), color);
        }
    }

    /// Fill the disc centered at `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        for row in pixel_span(cy - radius, cy + radius, self.height) {
            let dy = f64::from(row) + PIXEL_CENTER - cy;
            let half = (radius * radius - dy * dy).sqrt();
            if half.is_nan() {
                continue;
            }
            let cols = pixel_span(cx - half, cx + half, self.width);
            self.fill_row(row, cols, color);
        }
    }

    /// Flatten into `width * height * 4` bytes, RGBA order.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()
    }

    fn fill_row(&mut self, row: u32, cols: Range<u32>, color: Rgba) {
        if cols.is_empty() {
            return;
        }
        let start = self.index(cols.start, row);
        let end = start + (cols.end - cols.start) as usize;
        if let Some(span) = self.pixels.get_mut(start..end) {
            span.fill(color);
        }
    }

    fn index(&self, col: u32, row: u32) -> usize {
        (row as usize) * (self.width as usize) + (col as usize)
    }
}

/// Pixel indices whose centers lie in `[start, end)`, clipped to `[0, limit)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(start: f64, end: f64, limit: u32) -> Range<u32> {
    if !(start.is_finite() && end.is_finite()) || end <= start {
        return 0..0;
    }
    let lo = (start - PIXEL_CENTER).ceil().max(0.0);
    let hi = (end - PIXEL_CENTER).ceil().min(f64::from(limit));
    if hi <= lo {
        return 0..0;
    }
    (lo as u32)..(hi as u32)
}
