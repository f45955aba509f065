// ABOUTME: Event fan-out for a single connection
// ABOUTME: One ordered producer, any number of subscribers, no replay

/// Dispatcher implementation
pub mod dispatcher;

pub use dispatcher::{Dispatcher, Subscription};
