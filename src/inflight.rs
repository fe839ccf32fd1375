//! At-most-one-in-flight bookkeeping with cancel-and-replace.
//!
//! Owners keep an [`InFlight`] inside their own state lock. Starting a new
//! operation cancels the previous one; the superseded call observes the
//! cancellation through its [`Ticket`] and resolves with
//! [`ServiceError::Cancelled`].

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::{ServiceError, ServiceResult};

struct Active<K> {
    id: u64,
    key: K,
    cancel: Arc<Notify>,
}

pub struct InFlight<K> {
    active: Option<Active<K>>,
    next_id: u64,
}

/// Handle held by the task running one operation.
pub struct Ticket {
    id: u64,
    cancel: Arc<Notify>,
}

impl<K> InFlight<K> {
    pub fn new() -> Self {
        Self {
            active: None,
            next_id: 0,
        }
    }

    /// Key of the operation currently running, if any.
    pub fn current(&self) -> Option<&K> {
        self.active.as_ref().map(|a| &a.key)
    }

    /// Register a new operation, cancelling the one it replaces.
    ///
    /// Returns the new ticket and the key of the superseded operation.
    pub fn start(&mut self, key: K) -> (Ticket, Option<K>) {
        let superseded = self.cancel();
        self.next_id += 1;
        let cancel = Arc::new(Notify::new());
        self.active = Some(Active {
            id: self.next_id,
            key,
            cancel: Arc::clone(&cancel),
        });
        (
            Ticket {
                id: self.next_id,
                cancel,
            },
            superseded,
        )
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == ticket.id)
    }

    /// Clear the slot if `ticket` still owns it. Returns whether it did.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if self.is_current(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Cancel the running operation, if any, and return its key.
    pub fn cancel(&mut self) -> Option<K> {
        self.active.take().map(|active| {
            // notify_one stores a permit, so a task that has not polled
            // yet still sees the cancellation.
            active.cancel.notify_one();
            active.key
        })
    }
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticket {
    /// Drive `fut` until it completes or this ticket is cancelled.
    pub async fn run<T, F>(&self, fut: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        tokio::select! {
            result = fut => result,
            _ = self.cancel.notified() => Err(ServiceError::Cancelled),
        }
    }
}
