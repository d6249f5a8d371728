//! # Observable value cell.
//!
//! [`Store`] holds a current value and notifies its listeners synchronously on
//! every [`set`](Store::set). The poller exposes its [`PollerState`](crate::PollerState)
//! through one.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::listeners::{Listeners, Subscription};

/// Value cell with synchronous change listeners.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use pollvisor::Store;
///
/// let store = Store::new(1);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let sub = store.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
///
/// store.set(2);
/// sub.unsubscribe();
/// store.set(3);
///
/// assert_eq!(store.get(), 3);
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct Store<T> {
    value: Mutex<T>,
    listeners: Listeners<T>,
}

impl<T: Clone + Send + 'static> Store<T> {
    /// Creates a store holding `initial`. No notification is sent for it.
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            listeners: Listeners::new(),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the value, then notifies every listener with it.
    pub fn set(&self, value: T) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value.clone();
        self.listeners.notify(&value);
    }

    /// Registers a listener for future values (the current one is not replayed).
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Clone + Send + fmt::Debug + 'static> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_subscriber_sees_only_future_values() {
        let store = Store::new("initial");
        store.set("running");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |v: &&'static str| sink.lock().unwrap().push(*v));

        store.set("stopping");
        store.set("stopped");
        assert_eq!(*seen.lock().unwrap(), vec!["stopping", "stopped"]);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = Arc::new(Store::new(0_u32));
        let observed = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&store);
        let sink = Arc::clone(&observed);
        let _sub = store.subscribe(move |_: &u32| {
            *sink.lock().unwrap() = Some(inner.get());
        });

        store.set(5);
        assert_eq!(*observed.lock().unwrap(), Some(5));
    }
}
