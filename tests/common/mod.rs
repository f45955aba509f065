#![allow(dead_code)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wsplex::error::{Error, TransportError};
use wsplex::{
    ConnectionState, EventStream, JsonCodec, ObjectEncoder, Payload, SendObserver, Transport,
    TransportEvent,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub user: String,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Inbound {
    #[serde(rename = "chat")]
    Chat(ChatMessage),

    #[serde(rename = "presence")]
    Presence(Presence),
}

wsplex::narrow_variants!(Inbound {
    Chat => ChatMessage,
    Presence => Presence,
});

pub fn chat(user: &str, text: &str) -> ChatMessage {
    ChatMessage {
        user: user.to_string(),
        text: text.to_string(),
    }
}

pub fn presence(user: &str, online: bool) -> Presence {
    Presence {
        user: user.to_string(),
        online,
    }
}

/// Inbound transport text frame carrying `message` as JSON
pub fn frame(message: &Inbound) -> TransportEvent {
    TransportEvent::Message(Payload::Text(serde_json::to_string(message).unwrap()))
}

pub fn event_stream<S>(events: S, state: ConnectionState) -> EventStream<S, Inbound, JsonCodec>
where
    S: futures_util::Stream<Item = TransportEvent> + Unpin,
{
    EventStream::new(events, Arc::new(JsonCodec::new()), state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Accept,
    Reject,
    Fault,
}

/// Transport double that records every write attempt
pub struct MockTransport {
    behavior: Mutex<Behavior>,
    calls: Mutex<Vec<Payload>>,
}

impl MockTransport {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(Behavior::Accept)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::new(Behavior::Reject)
    }

    pub fn faulting() -> Arc<Self> {
        Self::new(Behavior::Fault)
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn writes(&self) -> Vec<Payload> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, payload: Payload) -> Result<bool, TransportError> {
        self.calls.lock().push(payload);
        match *self.behavior.lock() {
            Behavior::Accept => Ok(true),
            Behavior::Reject => Ok(false),
            Behavior::Fault => Err(TransportError::io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))),
        }
    }
}

/// Codec whose encoder always fails
pub struct FailingCodec;

impl<T> ObjectEncoder<T> for FailingCodec {
    fn encode(&self, _object: &T) -> Result<Payload, Error> {
        Err(Error::serialization(io::Error::new(
            io::ErrorKind::InvalidData,
            "cannot encode",
        )))
    }
}

/// JSON codec that counts encode calls
#[derive(Default)]
pub struct CountingCodec {
    inner: JsonCodec,
    encodes: AtomicUsize,
}

impl CountingCodec {
    pub fn encodes(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }
}

impl<T: Serialize> ObjectEncoder<T> for CountingCodec {
    fn encode(&self, object: &T) -> Result<Payload, Error> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        self.inner.encode(object)
    }
}

/// Observer that counts callbacks
#[derive(Default)]
pub struct RecordingObserver {
    pub sends: AtomicUsize,
    pub accepted: AtomicUsize,
    pub rejected: AtomicUsize,
    pub failed: AtomicUsize,
}

impl SendObserver for RecordingObserver {
    fn on_send(&self, _payload: &Payload) {
        self.sends.fetch_add(1, Ordering::SeqCst);
    }

    fn on_complete(&self, outcome: &wsplex::Result<bool>) {
        let counter = match outcome {
            Ok(true) => &self.accepted,
            Ok(false) => &self.rejected,
            Err(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}
