// ABOUTME: Client configuration for wsplex connections
// ABOUTME: Serde-deserializable settings loaded from TOML and validated before connecting

use crate::error::Error;
use crate::protocol::codec::FrameKind;
use serde::Deserialize;

/// Default queue depth for both directions
pub const DEFAULT_CAPACITY: usize = 256;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL (`ws://` or `wss://`)
    pub url: String,
    /// Outbound frames queued before sends are rejected
    pub outbound_capacity: usize,
    /// Inbound events buffered between the socket and the event stream
    pub inbound_capacity: usize,
    /// Frame type used when encoding objects
    pub frame: FrameKind,
    /// Log full payload text on send instead of just its length
    pub log_payloads: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080".to_string(),
            outbound_capacity: DEFAULT_CAPACITY,
            inbound_capacity: DEFAULT_CAPACITY,
            frame: FrameKind::Text,
            log_payloads: false,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Parse settings from a TOML document; missing keys take defaults
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the URL scheme and queue sizes
    pub fn validate(&self) -> Result<(), Error> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("invalid url {:?}: {}", self.url, e)))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::Config(format!(
                    "unsupported url scheme {:?}, expected ws or wss",
                    other
                )))
            }
        }

        if self.outbound_capacity == 0 {
            return Err(Error::Config("outbound_capacity must be at least 1".to_string()));
        }
        if self.inbound_capacity == 0 {
            return Err(Error::Config("inbound_capacity must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Builder-style override of the outbound queue depth
    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity;
        self
    }

    /// Builder-style override of the encoded frame type
    pub fn with_frame(mut self, frame: FrameKind) -> Self {
        self.frame = frame;
        self
    }

    /// Builder-style toggle for payload logging
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }
}
