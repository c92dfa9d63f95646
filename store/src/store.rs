//! Shared store handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::trace;

use crate::action::Action;
use crate::reducer;
use crate::state::AppState;

/// Shared, versioned application state.
///
/// Every dispatch bumps the version, which observers can await through
/// [`Store::changes`]. Dispatch is synchronous so it can run inside push
/// channel handlers.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<Mutex<AppState>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    /// Creates a store holding the given state.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(state)),
            version: Arc::new(version),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Folds an action into the state. Returns the new version.
    pub fn dispatch(&self, action: Action) -> u64 {
        let name = action.name();
        reducer::apply(&mut self.lock(), action);

        let mut version = 0;
        self.version.send_modify(|v| {
            *v = v.wrapping_add(1);
            version = *v;
        });
        trace!(action = name, version, "dispatched");
        version
    }

    /// Returns a copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    /// Reads part of the state.
    pub fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock())
    }

    /// Returns the current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Returns a receiver notified after every dispatch.
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
