//! Session connection lifecycle: open, inbound frame dispatch, send, close.
//!
//! A [`Connection`] is bound to one drawing id for its whole life and is never
//! reused. It does not spawn tasks; the owner drives it from a single event
//! loop by awaiting [`Connection::pump`], which receives the next inbound
//! frame and hands it to the registered [`FrameHandler`] before returning.
//!
//! STATE MACHINE
//! =============
//! `Connecting -> Open -> Closing -> Closed`, plus `Connecting -> Closed` when
//! the endpoint is unreachable. `Closed` is absorbing. There is no retry or
//! reconnect; the last transport error stays observable via
//! [`Connection::error`].

use std::time::Duration;

use frames::ShapeEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on waiting for the peer's close acknowledgement during
/// [`Connection::close`].
const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Lifecycle state of a session connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Transport failure recorded on a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The websocket handshake could not be completed.
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    /// The established websocket failed while sending or receiving.
    #[error("websocket transport failed: {0}")]
    Transport(Box<tokio_tungstenite::tungstenite::Error>),
}

/// Receives inbound frames, one call per frame, in transport order.
pub trait FrameHandler {
    fn on_frame(&mut self, frame: &str);
}

/// One persistent connection to a drawing session.
pub struct Connection<H> {
    drawing_id: String,
    url: String,
    state: ConnectionState,
    stream: Option<WsStream>,
    handler: Option<H>,
    error: Option<ConnectionError>,
}

impl<H: FrameHandler> Connection<H> {
    /// Connect to the session channel for `drawing_id`.
    ///
    /// Never fails outright: an unreachable endpoint yields a connection in
    /// [`ConnectionState::Closed`] with [`Connection::error`] set.
    pub async fn open(config: &ClientConfig, drawing_id: impl Into<String>) -> Self {
        let drawing_id = drawing_id.into();
        let url = config.endpoint_url(&drawing_id);
        let mut connection = Self {
            drawing_id,
            url,
            state: ConnectionState::Connecting,
            stream: None,
            handler: None,
            error: None,
        };

        match connect_async(connection.url.as_str()).await {
            Ok((stream, _response)) => {
                connection.stream = Some(stream);
                connection.state = ConnectionState::Open;
                info!(drawing_id = %connection.drawing_id, url = %connection.url, "session connection open");
            }
            Err(error) => {
                warn!(drawing_id = %connection.drawing_id, url = %connection.url, %error, "session connection failed");
                connection.error = Some(ConnectionError::Connect(Box::new(error)));
                connection.state = ConnectionState::Closed;
            }
        }

        connection
    }

    #[must_use]
    pub fn drawing_id(&self) -> &str {
        &self.drawing_id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// The transport error that closed this connection, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ConnectionError> {
        self.error.as_ref()
    }

    /// Register the frame handler, returning the one it replaces.
    pub fn on_frame(&mut self, handler: H) -> Option<H> {
        self.handler.replace(handler)
    }

    #[must_use]
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    pub fn handler_mut(&mut self) -> Option<&mut H> {
        self.handler.as_mut()
    }

    /// Consume the connection and hand back its handler.
    pub fn into_handler(self) -> Option<H> {
        self.handler
    }

    /// Wait for the next inbound frame and dispatch it.
    ///
    /// Returns `true` after one frame was received, `false` once the
    /// connection is closed. Control messages (ping, pong, close) are handled
    /// here and never reach the handler. Cancel-safe: dropping the future
    /// before it resolves loses no frame.
    pub async fn pump(&mut self) -> bool {
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        loop {
            let message = match stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(error)) => {
                    warn!(drawing_id = %self.drawing_id, %error, "session transport error");
                    self.error = Some(ConnectionError::Transport(Box::new(error)));
                    self.finish();
                    return false;
                }
                None => {
                    info!(drawing_id = %self.drawing_id, "session connection ended");
                    self.finish();
                    return false;
                }
            };

            match message {
                Message::Text(text) => {
                    dispatch(&mut self.handler, &self.drawing_id, text.as_str());
                    return true;
                }
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => {
                        dispatch(&mut self.handler, &self.drawing_id, text);
                        return true;
                    }
                    Err(error) => {
                        warn!(drawing_id = %self.drawing_id, %error, "dropping non-utf8 binary frame");
                    }
                },
                Message::Close(frame) => {
                    info!(drawing_id = %self.drawing_id, ?frame, "session closed by peer");
                    self.state = ConnectionState::Closing;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    /// Encode and send one shape event.
    ///
    /// Returns `false` without sending when the connection is not open; the
    /// event is not queued. A transport failure closes the connection.
    pub async fn send(&mut self, event: &ShapeEvent) -> bool {
        if self.state != ConnectionState::Open {
            debug!(drawing_id = %self.drawing_id, state = ?self.state, "connection not open; shape not sent");
            return false;
        }
        let Some(stream) = self.stream.as_mut() else {
            return false;
        };

        let frame = frames::encode(event);
        match stream.send(Message::Text(frame.into())).await {
            Ok(()) => {
                debug!(drawing_id = %self.drawing_id, kind = %event.kind, x = event.x, y = event.y, "shape sent");
                true
            }
            Err(error) => {
                warn!(drawing_id = %self.drawing_id, %error, "shape send failed");
                self.error = Some(ConnectionError::Transport(Box::new(error)));
                self.finish();
                false
            }
        }
    }

    /// Close the connection. Safe to call in any state and any number of
    /// times; a connection that is already closing or closed is left alone.
    pub async fn close(&mut self) {
        match self.state {
            ConnectionState::Closing | ConnectionState::Closed => {
                debug!(drawing_id = %self.drawing_id, state = ?self.state, "close ignored; already closing");
                return;
            }
            ConnectionState::Connecting => {
                self.finish();
                return;
            }
            ConnectionState::Open => {}
        }

        self.state = ConnectionState::Closing;
        if let Some(mut stream) = self.stream.take() {
            if let Err(error) = stream.close(None).await {
                debug!(drawing_id = %self.drawing_id, %error, "close handshake failed");
            }
            let drain = async { while let Some(Ok(_)) = stream.next().await {} };
            if tokio::time::timeout(CLOSE_DRAIN_TIMEOUT, drain).await.is_err() {
                debug!(drawing_id = %self.drawing_id, "peer did not acknowledge close in time");
            }
        }
        self.finish();
        info!(drawing_id = %self.drawing_id, "session connection closed");
    }

    fn finish(&mut self) {
        self.stream = None;
        self.state = ConnectionState::Closed;
    }
}

fn dispatch<H: FrameHandler>(handler: &mut Option<H>, drawing_id: &str, frame: &str) {
    match handler.as_mut() {
        Some(handler) => handler.on_frame(frame),
        None => debug!(drawing_id, "no frame handler registered; frame dropped"),
    }
}
