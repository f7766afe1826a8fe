//! Drawing surface, shape renderer, and pointer-input translation.
//!
//! This crate owns everything between a decoded [`frames::ShapeEvent`] and
//! pixels, plus the reverse path from a local pointer interaction to a new
//! shape event. It holds no session or network state; the host passes in the
//! surface and tool state it owns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`surface`] | RGBA pixel buffer with filled rect/circle primitives |
//! | [`render`] | Shape-type dispatch onto a [`surface::Surface`] |
//! | [`input`] | Pointer events, tool state, and shape translation |
//! | [`geom`] | Points and offset arithmetic |
//! | [`consts`] | Shared numeric constants (base radius, pixel sampling) |

pub mod consts;
pub mod geom;
pub mod input;
pub mod render;
pub mod surface;
