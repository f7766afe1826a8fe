//! In-process session server for integration tests.
//!
//! Serves `/websockets/{drawing_id}` (scripted frames out, client frames
//! recorded) and `/api/drawings/{drawing_id}` (canned snapshot JSON) on an
//! ephemeral localhost port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use drawboard::ClientConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Drawing id whose snapshot endpoint answers 404.
pub const MISSING_DRAWING: &str = "missing";

/// What the server does once its scripted frames are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterScript {
    /// Keep the socket open and record whatever the client sends.
    Listen,
    /// Start the close handshake.
    Close,
}

#[derive(Clone)]
struct FixtureState {
    script: Arc<Vec<String>>,
    after: AfterScript,
    received: mpsc::UnboundedSender<String>,
    joined: mpsc::UnboundedSender<String>,
    snapshot_hits: Arc<AtomicUsize>,
}

pub struct Fixture {
    pub addr: SocketAddr,
    /// Text frames the client sent, in order.
    pub received: mpsc::UnboundedReceiver<String>,
    /// Drawing ids of accepted session connections.
    pub joined: mpsc::UnboundedReceiver<String>,
    pub snapshot_hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl Fixture {
    /// Start a server. `script` gets the bound address so frames can name it.
    pub async fn spawn<F>(script: F, after: AfterScript) -> Self
    where
        F: FnOnce(SocketAddr) -> Vec<String>,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fixture");
        let addr = listener.local_addr().expect("fixture addr");
        let (received_tx, received) = mpsc::unbounded_channel();
        let (joined_tx, joined) = mpsc::unbounded_channel();
        let snapshot_hits = Arc::new(AtomicUsize::new(0));

        let state = FixtureState {
            script: Arc::new(script(addr)),
            after,
            received: received_tx,
            joined: joined_tx,
            snapshot_hits: Arc::clone(&snapshot_hits),
        };
        let app = Router::new()
            .route("/websockets/{drawing_id}", get(session_socket))
            .route("/api/drawings/{drawing_id}", get(drawing_snapshot))
            .with_state(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fixture server");
        });

        Self { addr, received, joined, snapshot_hits, task }
    }

    pub fn authority(&self) -> String {
        self.addr.to_string()
    }

    /// Client config pointed at this fixture, with a small surface.
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig { surface_width: 200, surface_height: 200, ..ClientConfig::default() };
        config.set_base_url(&format!("ws://{}", self.addr)).expect("fixture base url");
        config
    }

    pub fn snapshot_hits(&self) -> usize {
        self.snapshot_hits.load(Ordering::SeqCst)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// An address nothing listens on.
pub fn unreachable_config() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    let mut config = ClientConfig::default();
    config.set_base_url(&format!("ws://{addr}")).expect("probe base url");
    config
}

async fn session_socket(
    ws: WebSocketUpgrade,
    Path(drawing_id): Path<String>,
    State(state): State<FixtureState>,
) -> Response {
    ws.on_upgrade(move |socket| serve_session(socket, drawing_id, state))
}

async fn serve_session(mut socket: WebSocket, drawing_id: String, state: FixtureState) {
    state.joined.send(drawing_id).expect("joined channel");
    for frame in state.script.iter() {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    if state.after == AfterScript::Close && socket.send(Message::Close(None)).await.is_err() {
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                let _ = state.received.send(text.as_str().to_owned());
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

async fn drawing_snapshot(Path(drawing_id): Path<String>, State(state): State<FixtureState>) -> Response {
    state.snapshot_hits.fetch_add(1, Ordering::SeqCst);
    if drawing_id == MISSING_DRAWING {
        return (StatusCode::NOT_FOUND, "no such drawing").into_response();
    }
    Json(serde_json::json!({ "id": drawing_id, "shapes": [] })).into_response()
}

/// A shape frame in wire form.
pub fn shape_frame(x: f64, y: f64, color: &str, kind: &str) -> String {
    serde_json::json!({ "x": x, "y": y, "color": color, "type": kind }).to_string()
}

/// A relocation frame in wire form.
pub fn relocation_frame(location: &str) -> String {
    serde_json::json!({ "sseLocation": location }).to_string()
}
