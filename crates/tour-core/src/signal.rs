//! Publish/subscribe signals
//!
//! Provides [`Signal`], the observer primitive used by tours, documents and
//! the synchronizer. Delivery is synchronous and in subscription order.
//! The handler list is snapshotted before delivery, so handlers may
//! subscribe, unsubscribe or emit on the same signal without deadlocking.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Token returned by [`Signal::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Synchronous multi-subscriber notification channel
pub struct Signal<T> {
    handlers: Mutex<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> Signal<T> {
    /// Create signal with no subscribers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler
    ///
    /// Returns `false` if the token was unknown (already removed, or issued
    /// by another signal).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        handlers.len() != before
    }

    /// Deliver `value` to every current subscriber
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in snapshot {
            handler(value);
        }
    }

    /// Number of live subscriptions
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.handlers.lock().clear();
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
