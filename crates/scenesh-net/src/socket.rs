//! Line-oriented socket sessions for the `ssh` command.
//!
//! A connection is a pair of channels wired to a background pump task that
//! owns the actual WebSocket. The shell side never touches the socket:
//! it queues outgoing lines on `outbound` and drains `events`. The pump
//! guarantees that [`SocketEvent::Closed`] is the last event delivered for
//! a connection that went down, whatever the cause.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::warn;
use scenesh_types::error::{Result, ShellError};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Outgoing lines queued before backpressure kicks in.
const OUTBOUND_CAPACITY: usize = 64;
/// Incoming events buffered before the pump stalls.
const EVENT_CAPACITY: usize = 64;

/// Something the remote end did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// A text frame arrived.
    Message(String),
    /// The connection is gone. Always the final event.
    Closed,
}

/// A live line-oriented session.
///
/// Dropping the connection closes the socket: the pump sees the outbound
/// channel hang up and sends a close frame before exiting.
#[derive(Debug)]
pub struct SocketConnection {
    /// Lines to send to the remote end. Bounded.
    pub outbound: mpsc::Sender<String>,
    /// Events from the remote end, ending with `Closed`.
    pub events: mpsc::Receiver<SocketEvent>,
}

/// Opens socket sessions. The shell holds this as a trait object so tests
/// can swap in a scripted fake.
#[async_trait]
pub trait SocketConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<SocketConnection>;
}

/// Production connector speaking WebSocket text frames.
#[derive(Debug, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SocketConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<SocketConnection> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| ShellError::Transport(format!("{url}: {e}")))?;
        let (mut sink, mut stream) = ws.split();

        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<SocketEvent>(EVENT_CAPACITY);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outgoing = outbound_rx.recv() => match outgoing {
                        Some(line) => {
                            if sink.send(Message::text(line)).await.is_err() {
                                let _ = event_tx.send(SocketEvent::Closed).await;
                                break;
                            }
                        }
                        // Connection handle dropped; close politely.
                        None => {
                            let _ = sink.close().await;
                            break;
                        }
                    },
                    incoming = stream.next() => match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if event_tx
                                .send(SocketEvent::Message(text.to_string()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        // Control frames are handled by the protocol layer.
                        Some(Ok(msg)) if !msg.is_close() => {}
                        Some(Err(e)) => {
                            warn!("socket read failed: {e}");
                            let _ = event_tx.send(SocketEvent::Closed).await;
                            break;
                        }
                        _ => {
                            let _ = event_tx.send(SocketEvent::Closed).await;
                            break;
                        }
                    },
                }
            }
        });

        Ok(SocketConnection {
            outbound: outbound_tx,
            events: event_rx,
        })
    }
}
