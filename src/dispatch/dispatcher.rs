// ABOUTME: Single-producer event dispatcher
// ABOUTME: Copies each event to every live subscriber in order and ends all subscriptions on a terminal event

use crate::stream::events::Event;
use futures_util::{Stream, StreamExt};
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

struct Hub<M> {
    subscribers: Vec<mpsc::UnboundedSender<Event<M>>>,
    terminated: bool,
}

/// Fans one event sequence out to many subscribers
///
/// Subscribers only see events published after they subscribed. Once a
/// terminal event has been delivered every subscription ends, and later
/// subscriptions end immediately.
pub struct Dispatcher<M> {
    hub: Arc<Mutex<Hub<M>>>,
}

impl<M> Clone for Dispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<M: Clone + Send + 'static> Dispatcher<M> {
    /// Create a dispatcher with no subscribers
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Mutex::new(Hub {
                subscribers: Vec::new(),
                terminated: false,
            })),
        }
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut hub = self.hub.lock();
        if !hub.terminated {
            hub.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Deliver one event to every live subscriber
    ///
    /// Returns the number of subscribers that received it. Events published
    /// after a terminal event are dropped.
    pub fn publish(&self, event: Event<M>) -> usize {
        let mut hub = self.hub.lock();
        if hub.terminated {
            log::debug!("Dropping event published after termination");
            return 0;
        }

        let terminal = event.is_terminal();
        hub.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let delivered = hub.subscribers.len();

        if terminal {
            hub.terminated = true;
            hub.subscribers.clear();
        }

        delivered
    }

    /// Publish every event from `events` until it ends or terminates
    pub async fn run<S>(self, mut events: S)
    where
        S: Stream<Item = Event<M>> + Unpin,
    {
        while let Some(event) = events.next().await {
            let terminal = event.is_terminal();
            self.publish(event);
            if terminal {
                break;
            }
        }

        // Source ended without a terminal event; release subscribers anyway
        let mut hub = self.hub.lock();
        hub.terminated = true;
        hub.subscribers.clear();
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        let mut hub = self.hub.lock();
        hub.subscribers.retain(|tx| !tx.is_closed());
        hub.subscribers.len()
    }

    /// True once a terminal event was published
    pub fn is_terminated(&self) -> bool {
        self.hub.lock().terminated
    }
}

impl<M: Clone + Send + 'static> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream of events delivered to one subscriber
pub struct Subscription<M> {
    rx: mpsc::UnboundedReceiver<Event<M>>,
}

impl<M> Stream for Subscription<M> {
    type Item = Event<M>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
