//! Event subscriptions.
//!
//! Handlers run on the connection driver, one frame at a time, in delivery
//! order. A handler is removed when its [`SubscriptionHandle`] is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::messages::EventFrame;

type Handler = Arc<dyn Fn(&EventFrame) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler)>>,
}

/// Registered event handlers.
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
    registry: Arc<Registry>,
}

impl Subscribers {
    fn handlers(&self) -> MutexGuard<'_, Vec<(u64, Handler)>> {
        self.registry
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a handler.
    pub(crate) fn add(&self, handler: Handler) -> SubscriptionHandle {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers().push((id, handler));
        SubscriptionHandle {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Calls every handler with the frame. Returns the number called.
    pub(crate) fn dispatch(&self, frame: &EventFrame) -> usize {
        // Handlers may subscribe or unsubscribe, so call them unlocked.
        let handlers: Vec<Handler> = self
            .handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &handlers {
            handler(frame);
        }
        handlers.len()
    }

    /// Returns the number of registered handlers.
    pub(crate) fn len(&self) -> usize {
        self.handlers().len()
    }
}

/// Keeps a handler registered. Dropping it unsubscribes.
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct SubscriptionHandle {
    id: u64,
    registry: std::sync::Weak<Registry>,
}

impl SubscriptionHandle {
    /// Removes the handler.
    pub fn unsubscribe(self) {}
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .handlers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .finish()
    }
}
