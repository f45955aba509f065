// ABOUTME: Observers for the send path
// ABOUTME: Keeps diagnostics out of the sender; the default observer writes to the log facade

use crate::transport::Payload;
use crate::Result;

/// Log target used by [`LogObserver`]
pub const SEND_LOG_TARGET: &str = "wsplex::send";

/// Receives a callback around every transport write attempt
pub trait SendObserver: Send + Sync {
    /// A write is about to be attempted
    fn on_send(&self, _payload: &Payload) {}

    /// A send activation finished, with or without reaching the transport
    fn on_complete(&self, _outcome: &Result<bool>) {}
}

/// Observer that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SendObserver for NoopObserver {}

/// Observer that reports sends through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver {
    log_payloads: bool,
}

impl LogObserver {
    /// Create a log observer; `log_payloads` logs full text payloads
    pub fn new(log_payloads: bool) -> Self {
        Self { log_payloads }
    }
}

impl SendObserver for LogObserver {
    fn on_send(&self, payload: &Payload) {
        match payload.as_text() {
            Some(text) if self.log_payloads => {
                log::debug!(target: SEND_LOG_TARGET, "send text: {}", text);
            }
            _ => {
                log::debug!(
                    target: SEND_LOG_TARGET,
                    "send {} frame ({} bytes)",
                    if payload.is_binary() { "binary" } else { "text" },
                    payload.len()
                );
            }
        }
    }

    fn on_complete(&self, outcome: &Result<bool>) {
        match outcome {
            Ok(true) => {}
            Ok(false) => log::debug!(target: SEND_LOG_TARGET, "transport rejected frame"),
            Err(e) => log::warn!(target: SEND_LOG_TARGET, "send failed: {}", e),
        }
    }
}
