// ABOUTME: Outbound side of the multiplexer and the WebSocket client
// ABOUTME: Object codecs, deferred senders and connection wiring

/// WebSocket client implementation
pub mod client;
/// Object codec contract and JSON implementation
pub mod codec;
/// Raw and object senders
pub mod sender;

pub use client::ProtocolClient;
pub use codec::{FrameKind, JsonCodec, ObjectDecoder, ObjectEncoder};
pub use sender::{ConnectionSender, ObjectSender};
