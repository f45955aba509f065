// ABOUTME: Object codec contract and the serde_json implementation
// ABOUTME: Encodes domain objects into payloads and decodes payloads back into messages

use crate::error::Error;
use crate::transport::Payload;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Frame type produced when encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// UTF-8 text frames
    #[default]
    Text,
    /// Binary frames
    Binary,
}

/// Converts objects of type `T` into wire payloads
pub trait ObjectEncoder<T: ?Sized>: Send + Sync {
    /// Encode `object`; failures are reported as [`Error::Serialization`]
    fn encode(&self, object: &T) -> Result<Payload, Error>;
}

/// Converts wire payloads into messages of type `M`
pub trait ObjectDecoder<M>: Send + Sync {
    /// Decode `payload`; failures are reported as [`Error::Deserialization`]
    fn decode(&self, payload: &Payload) -> Result<M, Error>;
}

/// JSON codec backed by serde_json
///
/// Decodes text and binary frames alike. Encodes into the configured
/// [`FrameKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    frame: FrameKind,
}

impl JsonCodec {
    /// Codec producing text frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec producing frames of the given kind
    pub fn with_frame(frame: FrameKind) -> Self {
        Self { frame }
    }

    /// Frame kind used for encoding
    pub fn frame(&self) -> FrameKind {
        self.frame
    }
}

impl<T: Serialize + ?Sized> ObjectEncoder<T> for JsonCodec {
    fn encode(&self, object: &T) -> Result<Payload, Error> {
        match self.frame {
            FrameKind::Text => serde_json::to_string(object)
                .map(Payload::Text)
                .map_err(Error::serialization),
            FrameKind::Binary => serde_json::to_vec(object)
                .map(Payload::Binary)
                .map_err(Error::serialization),
        }
    }
}

impl<M: DeserializeOwned> ObjectDecoder<M> for JsonCodec {
    fn decode(&self, payload: &Payload) -> Result<M, Error> {
        serde_json::from_slice(payload.as_bytes()).map_err(Error::deserialization)
    }
}
