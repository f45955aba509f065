// ABOUTME: WebSocket transport built on tokio-tungstenite
// ABOUTME: Splits the socket into a queued writer task and an event-forwarding reader task

use crate::config::ClientConfig;
use crate::error::{Error, TransportError};
use crate::transport::{channel, EventReceiver, Payload, Transport, TransportEvent};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage, WebSocketStream};

/// Close code reported when the peer sent a close frame without a status
const NO_STATUS_CODE: u16 = 1005;

/// WebSocket connection handle
///
/// Owns the outbound queue. Dropping the last `Arc<WsTransport>` stops the
/// writer task; the reader task ends when the socket closes.
pub struct WsTransport {
    outbound: mpsc::Sender<WsMessage>,
    fault: Arc<Mutex<Option<TransportError>>>,
}

impl WsTransport {
    /// Connect to the configured server
    pub async fn connect(config: &ClientConfig) -> Result<(Arc<Self>, EventReceiver), Error> {
        let (ws_stream, _) = connect_async(config.url.as_str())
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        log::info!("Connected to {}", config.url);

        Ok(Self::from_stream(ws_stream, config))
    }

    /// Wrap an already established WebSocket stream
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_stream<S>(ws_stream: WebSocketStream<S>, config: &ClientConfig) -> (Arc<Self>, EventReceiver)
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (write, read) = ws_stream.split();
        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity.max(1));
        let (event_tx, events) = channel(config.inbound_capacity);
        let fault = Arc::new(Mutex::new(None));

        // Fresh channel with capacity >= 1, so Open is always first
        let _ = event_tx.try_send(TransportEvent::Open);

        tokio::spawn(write_loop(write, outbound_rx, Arc::clone(&fault)));
        tokio::spawn(read_loop(read, event_tx));

        let transport = Arc::new(Self {
            outbound: outbound_tx,
            fault,
        });

        (transport, events)
    }

    /// Queue a normal close frame
    ///
    /// Returns false if the close frame could not be queued.
    pub fn close(&self) -> bool {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };
        self.outbound.try_send(WsMessage::Close(Some(frame))).is_ok()
    }
}

impl Transport for WsTransport {
    fn send(&self, payload: Payload) -> Result<bool, TransportError> {
        if let Some(fault) = self.fault.lock().clone() {
            return Err(fault);
        }

        let frame = match payload {
            Payload::Text(text) => WsMessage::Text(text),
            Payload::Binary(bytes) => WsMessage::Binary(bytes),
        };

        match self.outbound.try_send(frame) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                log::debug!("Outbound queue full, rejecting frame");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => Ok(false),
        }
    }
}

async fn write_loop<S>(
    mut write: SplitSink<WebSocketStream<S>, WsMessage>,
    mut outbound: mpsc::Receiver<WsMessage>,
    fault: Arc<Mutex<Option<TransportError>>>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(frame) = outbound.recv().await {
        let closing = matches!(frame, WsMessage::Close(_));

        if let Err(e) = write.send(frame).await {
            log::warn!("WebSocket write failed: {}", e);
            *fault.lock() = Some(TransportError::io(e));
            break;
        }

        if closing {
            log::debug!("Close frame sent, writer stopping");
            break;
        }
    }
}

async fn read_loop<S>(mut read: SplitStream<WebSocketStream<S>>, events: mpsc::Sender<TransportEvent>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(frame) = read.next().await {
        let event = match frame {
            Ok(WsMessage::Text(text)) => TransportEvent::Message(Payload::Text(text)),
            Ok(WsMessage::Binary(bytes)) => TransportEvent::Message(Payload::Binary(bytes)),
            Ok(WsMessage::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (u16::from(f.code), f.reason.into_owned()))
                    .unwrap_or((NO_STATUS_CODE, String::new()));
                log::info!("Connection closing: code={} reason={:?}", code, reason);
                TransportEvent::Closing { code, reason }
            }
            // Ping/pong are answered by tungstenite itself
            Ok(_) => continue,
            Err(e) => {
                log::warn!("WebSocket read failed: {}", e);
                TransportEvent::Failure(TransportError::io(e))
            }
        };

        let terminal = !matches!(event, TransportEvent::Message(_));

        if events.send(event).await.is_err() {
            log::debug!("Event receiver dropped, reader stopping");
            return;
        }

        if terminal {
            break;
        }
    }

    // Tungstenite flushes its close reply on the next read
    while let Some(Ok(_)) = read.next().await {}
    log::debug!("Socket drained, reader stopping");
}
