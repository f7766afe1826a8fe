//! Client for a shared drawing surface.
//!
//! Module layout:
//!
//! | Module         | Role                                                     |
//! |----------------|----------------------------------------------------------|
//! | [`config`]     | env-driven client settings and endpoint URL building     |
//! | [`connection`] | session channel lifecycle and ordered frame dispatch     |
//! | [`view`]       | decoded frames drawn onto a surface; relocation state    |
//! | [`snapshot`]   | HTTP fetch of a drawing snapshot from a relocated host   |
//! | [`session`]    | ties a connection, a view, and snapshot fetches together |
//!
//! The wire codec lives in the `frames` crate; rasterization and pointer
//! translation live in `canvas`.

pub mod config;
pub mod connection;
pub mod session;
pub mod snapshot;
pub mod view;

pub use config::{ClientConfig, ConfigError};
pub use connection::{Connection, ConnectionError, ConnectionState, FrameHandler};
pub use session::DrawingSession;
pub use snapshot::{SnapshotClient, SnapshotError};
pub use view::{DrawingView, ViewStats};
