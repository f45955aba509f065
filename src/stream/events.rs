// ABOUTME: Ordered inbound event stream for one connection
// ABOUTME: Decodes transport messages and stops for good after Closed or Failure

use crate::error::Error;
use crate::protocol::codec::ObjectDecoder;
use crate::stream::state::{ConnectionState, Phase};
use crate::transport::TransportEvent;
use futures_util::stream::FusedStream;
use futures_util::{ready, Stream, StreamExt};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Close code for a normal closure
pub const NORMAL_CLOSURE: u16 = 1000;
/// Close code used when the transport ended without a close frame
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Why a connection closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    /// WebSocket close code
    pub code: u16,
    /// Human readable reason
    pub reason: String,
}

impl CloseReason {
    /// Build a close reason
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Transport went away without a closing handshake
    pub fn abnormal() -> Self {
        Self::new(ABNORMAL_CLOSURE, "transport ended without close frame")
    }

    /// True for code 1000
    pub fn is_normal(&self) -> bool {
        self.code == NORMAL_CLOSURE
    }
}

/// One occurrence on the connection timeline
#[derive(Debug, Clone)]
pub enum Event<M> {
    /// Connection established
    Open,
    /// A decoded inbound message
    Message(M),
    /// Connection closed (terminal)
    Closed(CloseReason),
    /// Connection failed or an inbound payload could not be decoded (terminal)
    Failure(Error),
}

impl<M> Event<M> {
    /// Closed and Failure end the sequence
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Closed(_) | Event::Failure(_))
    }

    /// Borrow the message, if this is a message event
    pub fn message(&self) -> Option<&M> {
        match self {
            Event::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Take the message, if this is a message event
    pub fn into_message(self) -> Option<M> {
        match self {
            Event::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// Lazy, ordered sequence of [`Event`]s for a single connection lifetime
///
/// Not restartable and keeps no replay buffer. After yielding a terminal
/// event it returns `None` forever without polling the transport again.
pub struct EventStream<S, M, C> {
    inner: S,
    codec: Arc<C>,
    state: ConnectionState,
    terminated: bool,
    _message: PhantomData<fn() -> M>,
}

impl<S, M, C> EventStream<S, M, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: ObjectDecoder<M>,
{
    /// Wrap a transport event source
    pub fn new(inner: S, codec: Arc<C>, state: ConnectionState) -> Self {
        Self {
            inner,
            codec,
            state,
            terminated: false,
            _message: PhantomData,
        }
    }

    /// Shared connection state this stream advances
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    fn terminate(&mut self, phase: Phase) {
        self.terminated = true;
        self.state.advance(phase);
    }
}

impl<S, M, C> Stream for EventStream<S, M, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: ObjectDecoder<M>,
{
    type Item = Event<M>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.terminated {
            return Poll::Ready(None);
        }

        loop {
            let event = match ready!(this.inner.poll_next_unpin(cx)) {
                Some(TransportEvent::Open) => {
                    if !this.state.advance(Phase::Open) {
                        log::debug!("Ignoring repeated open event");
                        continue;
                    }
                    Event::Open
                }
                Some(TransportEvent::Message(payload)) => {
                    // A message implies the connection is up
                    this.state.advance(Phase::Open);
                    match this.codec.decode(&payload) {
                        Ok(message) => Event::Message(message),
                        Err(e) => {
                            log::warn!("Failed to decode inbound payload: {}", e);
                            this.terminate(Phase::Failed);
                            Event::Failure(e)
                        }
                    }
                }
                Some(TransportEvent::Closing { code, reason }) => {
                    this.terminate(Phase::Closed);
                    Event::Closed(CloseReason::new(code, reason))
                }
                Some(TransportEvent::Failure(err)) => {
                    this.terminate(Phase::Failed);
                    Event::Failure(Error::Transport(err))
                }
                None => {
                    log::debug!("Transport ended without a close frame");
                    this.terminate(Phase::Closed);
                    Event::Closed(CloseReason::abnormal())
                }
            };

            return Poll::Ready(Some(event));
        }
    }
}

impl<S, M, C> FusedStream for EventStream<S, M, C>
where
    S: Stream<Item = TransportEvent> + Unpin,
    C: ObjectDecoder<M>,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}
