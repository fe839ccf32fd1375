//! Typed change notifications.
//!
//! Services own an [`EventBus`] per event type and emit after each state
//! mutation. Consumers hold a [`Subscription`]; dropping it unsubscribes.
//! Events are delivered to every live subscription in emission order.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const DEFAULT_CAPACITY: usize = 64;

/// Emitted by the photo feed after its collection changed.
///
/// Carries no payload; subscribers re-read the feed in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedChanged;

/// Emitted when a new avatar URL is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarChanged {
    pub url: String,
}

/// Session lifecycle signals for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credential and all cached state were wiped; return to login.
    LoggedOut,
}

pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver `event` to all current subscribers.
    ///
    /// Returns how many subscriptions received it. Emitting with no
    /// subscribers is not an error.
    pub fn emit(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<E> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Live registration on an [`EventBus`].
///
/// Only events emitted after `subscribe()` are observed.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription<E> {
    receiver: broadcast::Receiver<E>,
}

impl<E: Clone> Subscription<E> {
    /// Wait for the next event. `None` once the bus is gone.
    ///
    /// A subscriber that fell behind skips the overwritten events and
    /// continues with the oldest one still buffered.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Subscriber lagged, skipping events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered event, without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Subscriber lagged, skipping events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Discard pending events and return how many there were.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.try_recv().is_some() {
            count += 1;
        }
        count
    }
}
