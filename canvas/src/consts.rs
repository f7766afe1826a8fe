//! Shared numeric constants for the canvas crate.

// ── Shapes ──────────────────────────────────────────────────────

/// Base radius in surface pixels. Every shape size is a multiple of it.
pub const RADIUS: f64 = 8.0;

// ── Surface ─────────────────────────────────────────────────────

/// Offset from a pixel's top-left corner to its sample point.
pub const PIXEL_CENTER: f64 = 0.5;
