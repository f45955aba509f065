// ABOUTME: Deferred send path for raw payloads and encoded objects
// ABOUTME: Each activation performs at most one transport write and reports its own outcome

use crate::deferred::Deferred;
use crate::error::{Error, TransportError};
use crate::observer::{LogObserver, SendObserver};
use crate::protocol::codec::ObjectEncoder;
use crate::stream::state::ConnectionState;
use crate::transport::{Payload, Transport};
use std::sync::{Arc, Weak};

/// Sends raw payloads over a connection it does not own
///
/// Cheap to clone and safe to use from many tasks at once. Every send is
/// returned as a [`Deferred`]; the transport is only touched on activation.
#[derive(Clone)]
pub struct ConnectionSender {
    transport: Weak<dyn Transport>,
    state: ConnectionState,
    observer: Arc<dyn SendObserver>,
}

impl ConnectionSender {
    /// Sender for `transport`, logging through [`LogObserver`]
    pub fn new<T: Transport + 'static>(transport: &Arc<T>, state: ConnectionState) -> Self {
        let transport: Weak<T> = Arc::downgrade(transport);
        let transport: Weak<dyn Transport> = transport;
        Self {
            transport,
            state,
            observer: Arc::new(LogObserver::default()),
        }
    }

    /// Replace the send observer
    pub fn with_observer(mut self, observer: Arc<dyn SendObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Shared connection state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// True while the connection is alive and not in a terminal phase
    pub fn is_connected(&self) -> bool {
        self.transport.strong_count() > 0 && !self.state.is_terminal()
    }

    /// Enqueue a text message
    ///
    /// Resolves to `true` if the transport accepted the write, `false` if it
    /// rejected it, and fails with [`TransportError`] on a transport fault or
    /// a closed connection.
    pub fn send(&self, text: impl Into<String>) -> Deferred<bool> {
        self.send_payload(Payload::Text(text.into()))
    }

    /// Enqueue any payload
    pub fn send_payload(&self, payload: Payload) -> Deferred<bool> {
        let sender = self.clone();
        Deferred::new(move || sender.write(payload))
    }

    pub(crate) fn write(&self, payload: Payload) -> Result<bool, Error> {
        let outcome = self.try_write(payload);
        self.observer.on_complete(&outcome);
        outcome
    }

    fn try_write(&self, payload: Payload) -> Result<bool, Error> {
        let transport = self.transport.upgrade().ok_or(TransportError::Dropped)?;

        if self.state.is_terminal() {
            return Err(TransportError::Closed.into());
        }

        self.observer.on_send(&payload);
        Ok(transport.send(payload)?)
    }
}

/// Encodes objects with a codec and sends them through a [`ConnectionSender`]
pub struct ObjectSender<C> {
    sender: ConnectionSender,
    codec: Arc<C>,
}

impl<C> Clone for ObjectSender<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: Send + Sync + 'static> ObjectSender<C> {
    /// Pair a sender with a codec
    pub fn new(sender: ConnectionSender, codec: Arc<C>) -> Self {
        Self { sender, codec }
    }

    /// Encode and enqueue `object`
    ///
    /// Encoding happens on activation. An encode failure fails the
    /// computation with [`Error::Serialization`] and nothing is written.
    pub fn send_object<T>(&self, object: T) -> Deferred<bool>
    where
        C: ObjectEncoder<T>,
        T: Send + 'static,
    {
        let sender = self.sender.clone();
        let codec = Arc::clone(&self.codec);

        Deferred::new(move || match codec.encode(&object) {
            Ok(payload) => sender.write(payload),
            Err(e) => {
                let outcome = Err(e);
                sender.observer.on_complete(&outcome);
                outcome
            }
        })
    }

    /// Enqueue a raw text message, bypassing the codec
    pub fn send(&self, text: impl Into<String>) -> Deferred<bool> {
        self.sender.send(text)
    }

    /// Underlying raw sender
    pub fn connection(&self) -> &ConnectionSender {
        &self.sender
    }

    /// Codec used for encoding
    pub fn codec(&self) -> &Arc<C> {
        &self.codec
    }
}
