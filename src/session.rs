//! A joined drawing session: one connection, one view, and the snapshot
//! fetches triggered by relocation frames.
//!
//! Everything runs on the caller's task. [`DrawingSession::step`] waits for
//! whichever comes first, an inbound frame or a finished snapshot fetch, so a
//! slow snapshot authority never holds up frame dispatch.

use canvas::input::PointerEvent;
use frames::Relocation;
use serde_json::Value;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionState};
use crate::snapshot::{SnapshotClient, SnapshotError};
use crate::view::DrawingView;

type FetchOutcome = (String, Result<Value, SnapshotError>);

pub struct DrawingSession {
    config: ClientConfig,
    connection: Connection<DrawingView>,
    snapshots: SnapshotClient,
    fetches: JoinSet<FetchOutcome>,
}

impl DrawingSession {
    /// Open the session channel for `drawing_id` and attach a fresh view.
    ///
    /// Check [`Self::state`] afterwards; an unreachable server yields a
    /// session that is already closed.
    pub async fn enter(config: ClientConfig, drawing_id: &str) -> Self {
        let mut connection = Connection::open(&config, drawing_id).await;
        connection.on_frame(DrawingView::new(drawing_id, &config));
        Self {
            config,
            connection,
            snapshots: SnapshotClient::new(),
            fetches: JoinSet::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    #[must_use]
    pub fn connection(&self) -> &Connection<DrawingView> {
        &self.connection
    }

    #[must_use]
    pub fn view(&self) -> Option<&DrawingView> {
        self.connection.handler()
    }

    pub fn view_mut(&mut self) -> Option<&mut DrawingView> {
        self.connection.handler_mut()
    }

    /// Snapshot fetches still in flight.
    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.fetches.len()
    }

    /// Translate a pointer interaction and send the resulting shape.
    ///
    /// Returns `true` only when a shape was placed and sent.
    pub async fn pointer(&mut self, event: &PointerEvent) -> bool {
        let Some(shape) = self.connection.handler().and_then(|view| view.placement(event)) else {
            return false;
        };
        self.connection.send(&shape).await
    }

    /// Wait for one unit of progress: an inbound frame or a finished fetch.
    ///
    /// Returns `false` once the connection is closed and no fetch is pending.
    pub async fn step(&mut self) -> bool {
        let connection_live = self.connection.state() != ConnectionState::Closed;
        let fetching = !self.fetches.is_empty();
        if !connection_live && !fetching {
            return false;
        }

        tokio::select! {
            received = self.connection.pump(), if connection_live => {
                self.start_fetches();
                received || !self.fetches.is_empty()
            }
            Some(joined) = self.fetches.join_next(), if fetching => {
                self.finish_fetch(joined);
                true
            }
            else => false,
        }
    }

    /// Drive [`Self::step`] until the session ends.
    pub async fn run(&mut self) {
        while self.step().await {}
    }

    /// Close the connection, abandon in-flight fetches, and return the view.
    pub async fn teardown(mut self) -> Option<DrawingView> {
        self.connection.close().await;
        if !self.fetches.is_empty() {
            debug!(pending = self.fetches.len(), "abandoning snapshot fetches");
        }
        self.fetches.shutdown().await;
        info!(drawing_id = %self.connection.drawing_id(), "session torn down");
        self.connection.into_handler()
    }

    fn start_fetches(&mut self) {
        let Some(view) = self.connection.handler_mut() else {
            return;
        };
        let mut relocations = Vec::new();
        while let Some(relocation) = view.take_relocation() {
            relocations.push(relocation);
        }
        for relocation in relocations {
            self.spawn_fetch(relocation);
        }
    }

    fn spawn_fetch(&mut self, relocation: Relocation) {
        let url = self
            .config
            .snapshot_url(&relocation.sse_location, self.connection.drawing_id());
        let client = self.snapshots.clone();
        debug!(%url, "starting snapshot fetch");
        self.fetches.spawn(async move {
            let outcome = client.fetch(&url).await;
            (url, outcome)
        });
    }

    fn finish_fetch(&mut self, joined: Result<FetchOutcome, JoinError>) {
        match joined {
            Ok((url, Ok(snapshot))) => {
                info!(%url, "snapshot loaded");
                if let Some(view) = self.connection.handler_mut() {
                    view.apply_snapshot(snapshot);
                }
            }
            Ok((url, Err(error))) => warn!(%url, %error, "snapshot fetch failed"),
            Err(error) => warn!(%error, "snapshot fetch task failed"),
        }
    }
}
