// ABOUTME: Inbound side of the multiplexer
// ABOUTME: Event stream, connection state machine and typed filtering

/// Event type and the per-connection event stream
pub mod events;
/// Typed narrowing of event sequences
pub mod filter;
/// Connection lifecycle state machine
pub mod state;

pub use events::{CloseReason, Event, EventStream};
pub use filter::{filter_and_map, narrow_iter, MessageSource, Narrow, NarrowExt, Narrowed};
pub use state::{ConnectionState, Phase};
