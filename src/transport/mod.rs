// ABOUTME: Transport boundary between the multiplexer and a live connection
// ABOUTME: Payload, TransportEvent, the Transport trait and the inbound event channel

/// tokio-tungstenite backed WebSocket transport
pub mod ws;

pub use ws::WsTransport;

use crate::error::TransportError;
use futures_util::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// A single wire payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text frame
    Text(String),
    /// Binary frame
    Binary(Vec<u8>),
}

impl Payload {
    /// Raw bytes of the payload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    /// Text content, if this is a text frame
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Binary(_) => None,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True if the payload carries no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for binary frames
    pub fn is_binary(&self) -> bool {
        matches!(self, Payload::Binary(_))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

/// Raw occurrences on a connection, in arrival order
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Connection established
    Open,
    /// Text or binary frame received
    Message(Payload),
    /// Peer (or local side) is closing the connection
    Closing {
        /// WebSocket close code
        code: u16,
        /// Close reason text
        reason: String,
    },
    /// The connection failed
    Failure(TransportError),
}

/// Write side of a live connection
///
/// `send` returns `Ok(true)` when the payload was accepted into the outbound
/// queue, `Ok(false)` when the transport refused it (queue full, connection
/// closing) and `Err` when the transport itself faulted.
pub trait Transport: Send + Sync {
    /// Attempt to enqueue one payload for writing
    fn send(&self, payload: Payload) -> Result<bool, TransportError>;
}

/// Create a bounded inbound event channel
pub fn channel(capacity: usize) -> (mpsc::Sender<TransportEvent>, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, EventReceiver { rx })
}

/// Stream of transport events fed by a single producer
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<TransportEvent>,
}

impl EventReceiver {
    /// Stop accepting new events; already queued events are still delivered
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for EventReceiver {
    type Item = TransportEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
