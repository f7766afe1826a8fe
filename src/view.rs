//! Client-side view of one drawing: the pixel surface, the local tool, and
//! whatever relocation and snapshot state the session channel has produced.
//!
//! Inbound frames are decoded and drawn in arrival order. Shapes placed
//! locally are not drawn here; they appear once the server echoes them back.

use std::collections::VecDeque;

use canvas::geom::Point;
use canvas::input::{PointerEvent, ToolState, translate};
use canvas::render::render;
use canvas::surface::Surface;
use frames::{Inbound, Relocation, ShapeEvent};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::connection::FrameHandler;

/// Per-view frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Shapes drawn onto the surface.
    pub rendered: usize,
    /// Shapes with an unknown type; decoded but not drawn.
    pub ignored: usize,
    /// Relocation frames received.
    pub relocations: usize,
    /// Frames that failed to decode.
    pub rejected: usize,
}

pub struct DrawingView {
    drawing_id: String,
    surface: Surface,
    tool: ToolState,
    origin: Point,
    pending_relocations: VecDeque<Relocation>,
    sse_location: Option<String>,
    snapshot: Option<Value>,
    stats: ViewStats,
}

impl DrawingView {
    #[must_use]
    pub fn new(drawing_id: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            drawing_id: drawing_id.into(),
            surface: Surface::new(config.surface_width, config.surface_height),
            tool: config.tool.clone(),
            origin: Point::default(),
            pending_relocations: VecDeque::new(),
            sse_location: None,
            snapshot: None,
            stats: ViewStats::default(),
        }
    }

    #[must_use]
    pub fn drawing_id(&self) -> &str {
        &self.drawing_id
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut ToolState {
        &mut self.tool
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Set the surface's top-left corner in page coordinates.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Shape a pointer interaction would place, if any.
    #[must_use]
    pub fn placement(&self, event: &PointerEvent) -> Option<ShapeEvent> {
        translate(event, self.origin, &self.tool)
    }

    /// Most recent snapshot authority announced by the server.
    #[must_use]
    pub fn sse_location(&self) -> Option<&str> {
        self.sse_location.as_deref()
    }

    /// Oldest relocation that has not been acted on yet.
    pub fn take_relocation(&mut self) -> Option<Relocation> {
        self.pending_relocations.pop_front()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Value> {
        self.snapshot.as_ref()
    }

    pub fn apply_snapshot(&mut self, snapshot: Value) {
        self.snapshot = Some(snapshot);
    }

    #[must_use]
    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Draw one decoded shape. Returns whether anything was drawn.
    pub fn draw(&mut self, shape: &ShapeEvent) -> bool {
        if render(&mut self.surface, shape) {
            self.stats.rendered += 1;
            true
        } else {
            debug!(drawing_id = %self.drawing_id, kind = %shape.kind, "unknown shape type; nothing drawn");
            self.stats.ignored += 1;
            false
        }
    }

    fn relocate(&mut self, relocation: Relocation) {
        info!(drawing_id = %self.drawing_id, location = %relocation.sse_location, "snapshot authority relocated");
        self.stats.relocations += 1;
        self.sse_location = Some(relocation.sse_location.clone());
        self.pending_relocations.push_back(relocation);
    }
}

impl FrameHandler for DrawingView {
    fn on_frame(&mut self, frame: &str) {
        match frames::decode(frame) {
            Ok(Inbound::Shape(shape)) => {
                self.draw(&shape);
            }
            Ok(Inbound::Relocate(relocation)) => self.relocate(relocation),
            Err(error) => {
                warn!(drawing_id = %self.drawing_id, %error, "dropping undecodable frame");
                self.stats.rejected += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
