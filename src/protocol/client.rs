// ABOUTME: WebSocket client wiring for the multiplexer
// ABOUTME: Connects the transport and hands out the object sender and the event stream

use crate::config::ClientConfig;
use crate::error::Error;
use crate::observer::LogObserver;
use crate::protocol::codec::{JsonCodec, ObjectDecoder};
use crate::protocol::sender::{ConnectionSender, ObjectSender};
use crate::stream::events::EventStream;
use crate::stream::state::ConnectionState;
use crate::transport::{EventReceiver, WsTransport};
use std::sync::Arc;

/// Event stream type produced by [`ProtocolClient`]
pub type ClientEvents<M, C> = EventStream<EventReceiver, M, C>;

/// WebSocket client decoding inbound frames into `M`
pub struct ProtocolClient<M, C = JsonCodec> {
    transport: Arc<WsTransport>,
    sender: ObjectSender<C>,
    events: ClientEvents<M, C>,
}

impl<M, C> ProtocolClient<M, C>
where
    C: ObjectDecoder<M> + 'static,
{
    /// Connect to `config.url` using `codec` for both directions
    pub async fn connect(config: ClientConfig, codec: C) -> Result<Self, Error> {
        config.validate()?;

        let (transport, inbound) = WsTransport::connect(&config).await?;

        let codec = Arc::new(codec);
        let state = ConnectionState::new();
        let observer = Arc::new(LogObserver::new(config.log_payloads));

        let sender = ConnectionSender::new(&transport, state.clone()).with_observer(observer);
        let sender = ObjectSender::new(sender, Arc::clone(&codec));
        let events = EventStream::new(inbound, codec, state);

        Ok(Self {
            transport,
            sender,
            events,
        })
    }

    /// Another handle for sending
    pub fn sender(&self) -> ObjectSender<C> {
        self.sender.clone()
    }

    /// Shared connection state
    pub fn state(&self) -> &ConnectionState {
        self.events.state()
    }

    /// Split into the transport handle, the sender and the event stream
    ///
    /// The transport handle owns the connection: once it and every clone are
    /// dropped, further sends fail with `TransportError::Dropped`.
    pub fn split(self) -> (Arc<WsTransport>, ObjectSender<C>, ClientEvents<M, C>) {
        (self.transport, self.sender, self.events)
    }
}

impl<M> ProtocolClient<M, JsonCodec>
where
    JsonCodec: ObjectDecoder<M>,
{
    /// Connect with a [`JsonCodec`] using the configured frame kind
    pub async fn connect_json(config: ClientConfig) -> Result<Self, Error> {
        let codec = JsonCodec::with_frame(config.frame);
        Self::connect(config, codec).await
    }
}
