//! Shape model: the unit of synchronization exchanged over the session channel.
//!
//! Both tag types are open: unrecognized strings from peers are preserved in
//! an `Other` variant so they survive a decode/encode cycle and can be handled
//! as no-ops (unknown type) or default-filled (unknown color) by the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

/// Kind of primitive shape placed on the surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeType {
    /// Filled circle with the base radius.
    SmallCircle,
    /// Filled circle with twice the base radius.
    BigCircle,
    /// Filled square with side four times the base radius.
    BigSquare,
    /// Filled square with side twice the base radius.
    SmallSquare,
    /// A type tag this client does not know about.
    Other(String),
}

impl ShapeType {
    /// Wire tag for this shape type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SmallCircle => "SMALL_CIRCLE",
            Self::BigCircle => "BIG_CIRCLE",
            Self::BigSquare => "BIG_SQUARE",
            Self::SmallSquare => "SMALL_SQUARE",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this is one of the four shape types this client can render.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for ShapeType {
    fn from(tag: &str) -> Self {
        match tag {
            "SMALL_CIRCLE" => Self::SmallCircle,
            "BIG_CIRCLE" => Self::BigCircle,
            "BIG_SQUARE" => Self::BigSquare,
            "SMALL_SQUARE" => Self::SmallSquare,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ShapeType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ShapeType> for String {
    fn from(kind: ShapeType) -> Self {
        match kind {
            ShapeType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic fill color tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeColor {
    Black,
    Blue,
    Green,
    Red,
    Yellow,
    /// A color tag this client does not know about.
    Other(String),
}

impl ShapeColor {
    /// Wire tag for this color.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Black => "BLACK",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for ShapeColor {
    fn from(tag: &str) -> Self {
        match tag {
            "BLACK" => Self::Black,
            "BLUE" => Self::Blue,
            "GREEN" => Self::Green,
            "RED" => Self::Red,
            "YELLOW" => Self::Yellow,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ShapeColor {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ShapeColor> for String {
    fn from(color: ShapeColor) -> Self {
        match color {
            ShapeColor::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ShapeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synchronized primitive-shape placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeEvent {
    /// Surface x coordinate of the shape center.
    pub x: f64,
    /// Surface y coordinate of the shape center.
    pub y: f64,
    pub color: ShapeColor,
    #[serde(rename = "type")]
    pub kind: ShapeType,
}

impl ShapeEvent {
    #[must_use]
    pub fn new(x: f64, y: f64, color: ShapeColor, kind: ShapeType) -> Self {
        Self { x, y, color, kind }
    }
}

/// Control message pointing at the authority that serves the session snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// `host:port` authority of the snapshot API.
    #[serde(rename = "sseLocation")]
    pub sse_location: String,
}
