// ABOUTME: Main library entry point for wsplex
// ABOUTME: Exports the typed event multiplexer API and the crate error types

//! # wsplex
//!
//! Typed event multiplexer for a single bidirectional WebSocket connection.
//!
//! Outgoing messages are wrapped in [`Deferred`] computations that touch the
//! transport only when run or awaited. Inbound frames are decoded into an
//! ordered [`EventStream`] that terminates on close or failure, and
//! [`filter_and_map`] narrows that stream down to one message variant.

#![warn(missing_docs)]

/// Client configuration
pub mod config;
/// Deferred single-value computations
pub mod deferred;
/// Fan-out of one event stream to many subscribers
pub mod dispatch;
/// Send path observers
pub mod observer;
/// Codecs, senders and the WebSocket client
pub mod protocol;
/// Inbound event streams, connection state and typed filtering
pub mod stream;
/// Transport boundary and the tokio-tungstenite implementation
pub mod transport;

pub use config::ClientConfig;
pub use deferred::Deferred;
pub use dispatch::{Dispatcher, Subscription};
pub use observer::{LogObserver, NoopObserver, SendObserver};
pub use protocol::client::ProtocolClient;
pub use protocol::codec::{FrameKind, JsonCodec, ObjectDecoder, ObjectEncoder};
pub use protocol::sender::{ConnectionSender, ObjectSender};
pub use stream::events::{CloseReason, Event, EventStream};
pub use stream::filter::{filter_and_map, narrow_iter, MessageSource, Narrow, NarrowExt, Narrowed};
pub use stream::state::{ConnectionState, Phase};
pub use transport::{Payload, Transport, TransportEvent, WsTransport};
pub use error::{Error, TransportError};

/// Result type for wsplex operations
pub type Result<T> = std::result::Result<T, error::Error>;

/// Error types for wsplex
pub mod error {
    use std::sync::Arc;
    use thiserror::Error;

    /// Shared, cloneable underlying cause of a failure
    pub type Cause = Arc<dyn std::error::Error + Send + Sync>;

    /// Faults raised by, or about, the underlying transport
    #[derive(Error, Debug, Clone)]
    pub enum TransportError {
        /// The connection already reached a terminal state
        #[error("connection is closed")]
        Closed,

        /// The owner of the connection has dropped it
        #[error("connection has been dropped")]
        Dropped,

        /// The transport failed while writing or reading
        #[error("I/O failure: {0}")]
        Io(#[source] Cause),
    }

    impl TransportError {
        /// Wrap any error as a transport I/O failure
        pub fn io<E>(err: E) -> Self
        where
            E: std::error::Error + Send + Sync + 'static,
        {
            TransportError::Io(Arc::new(err))
        }
    }

    /// Error types for wsplex operations
    #[derive(Error, Debug, Clone)]
    pub enum Error {
        /// Underlying write or connection fault
        #[error("Transport error: {0}")]
        Transport(#[from] TransportError),

        /// An object could not be converted to a payload
        #[error("Serialization error: {0}")]
        Serialization(#[source] Cause),

        /// An inbound payload could not be converted to an object
        #[error("Deserialization error: {0}")]
        Deserialization(#[source] Cause),

        /// Establishing the connection failed
        #[error("Connection error: {0}")]
        Connection(String),

        /// Invalid client configuration
        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl Error {
        /// Wrap an encode failure
        pub fn serialization<E>(err: E) -> Self
        where
            E: std::error::Error + Send + Sync + 'static,
        {
            Error::Serialization(Arc::new(err))
        }

        /// Wrap a decode failure
        pub fn deserialization<E>(err: E) -> Self
        where
            E: std::error::Error + Send + Sync + 'static,
        {
            Error::Deserialization(Arc::new(err))
        }

        /// True for any transport-level fault
        pub fn is_transport(&self) -> bool {
            matches!(self, Error::Transport(_))
        }
    }
}
