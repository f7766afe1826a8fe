//! Shape model and JSON codec for the drawing session channel.
//!
//! This crate owns the wire representation exchanged between drawing clients.
//! Each frame is a single JSON object that is either a shape placement or a
//! session-relocation notice:
//!
//! ```text
//! {"x": 10, "y": 20, "color": "BLUE", "type": "BIG_CIRCLE"}
//! {"sseLocation": "host:8080"}
//! ```
//!
//! Decoding is strict structured parsing. Frame text is never interpreted as
//! anything other than data.

pub mod shape;

use serde_json::Value;

pub use shape::{Relocation, ShapeColor, ShapeEvent, ShapeType};

/// Field whose presence marks a frame as a [`Relocation`].
pub const RELOCATION_FIELD: &str = "sseLocation";

/// Error returned by [`decode`] and [`decode_bytes`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not valid JSON.
    #[error("failed to parse frame: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is valid JSON but not an object.
    #[error("frame payload is not a JSON object")]
    NotAnObject,
    /// The payload lacks a shape field or carries one of the wrong type.
    #[error("invalid shape frame: {0}")]
    InvalidShape(#[source] serde_json::Error),
    /// The `sseLocation` field is present but not a string.
    #[error("invalid relocation frame: {0}")]
    InvalidRelocation(#[source] serde_json::Error),
}

/// A decoded inbound frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// A remote shape placement to render.
    Shape(ShapeEvent),
    /// A pointer to where the full session snapshot can be fetched.
    Relocate(Relocation),
}

/// Encode a shape event into its JSON wire payload.
///
/// Non-finite coordinates serialize as `null` and will not decode back.
#[must_use]
pub fn encode(event: &ShapeEvent) -> String {
    // Plain numeric and string fields: serializing into a String cannot fail.
    serde_json::to_string(event).unwrap_or_default()
}

/// Decode a text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON, [`CodecError::NotAnObject`]
/// for non-object payloads, and [`CodecError::InvalidShape`] /
/// [`CodecError::InvalidRelocation`] when required fields are missing or mistyped.
pub fn decode(raw: &str) -> Result<Inbound, CodecError> {
    let value = serde_json::from_str::<Value>(raw)?;
    classify(value)
}

/// Decode a frame delivered as bytes (e.g. a binary websocket message).
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_bytes(raw: &[u8]) -> Result<Inbound, CodecError> {
    let value = serde_json::from_slice::<Value>(raw)?;
    classify(value)
}

fn classify(value: Value) -> Result<Inbound, CodecError> {
    let Value::Object(map) = value else {
        return Err(CodecError::NotAnObject);
    };

    // Relocation wins over shape fields on the same frame.
    if map.contains_key(RELOCATION_FIELD) {
        return serde_json::from_value::<Relocation>(Value::Object(map))
            .map(Inbound::Relocate)
            .map_err(CodecError::InvalidRelocation);
    }

    serde_json::from_value::<ShapeEvent>(Value::Object(map))
        .map(Inbound::Shape)
        .map_err(CodecError::InvalidShape)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
