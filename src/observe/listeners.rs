//! # Ordered listener registry shared by [`Store`](super::Store) and [`Emitter`](super::Emitter).
//!
//! ## Rules
//! - Listeners run **synchronously**, in subscription order, on the notifying thread.
//! - The registry lock is **not** held while listeners run (a listener may subscribe,
//!   unsubscribe or read the owning cell).
//! - A listener removed during a notification still sees that notification.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Shared listener callback.
pub(crate) type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Listener set with stable ids for removal.
pub(crate) struct Listeners<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<T>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `listener` and returns the handle that removes it.
    pub(crate) fn add(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut reg = self.lock();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.entries.push((id, listener));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    let mut reg = registry.lock().unwrap_or_else(PoisonError::into_inner);
                    reg.entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Invokes every registered listener with `value`.
    pub(crate) fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().entries.len()
    }
}

/// Handle returned by `subscribe`; call [`unsubscribe`](Subscription::unsubscribe) to stop listening.
///
/// Dropping the handle keeps the listener registered.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the listener. No-op if the observed cell no longer exists.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let listeners = Listeners::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            let _ = listeners.add(Arc::new(move |v: &u32| {
                seen.lock().unwrap().push(format!("{tag}{v}"));
            }));
        }
        listeners.notify(&7);

        assert_eq!(*seen.lock().unwrap(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let listeners = Listeners::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h1 = Arc::clone(&hits);
        let first = listeners.add(Arc::new(move |_: &()| {
            h1.fetch_add(1, Ordering::SeqCst);
        }));
        let h2 = Arc::clone(&hits);
        let _second = listeners.add(Arc::new(move |_: &()| {
            h2.fetch_add(10, Ordering::SeqCst);
        }));

        first.unsubscribe();
        listeners.notify(&());

        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped_is_noop() {
        let listeners = Listeners::<()>::new();
        let sub = listeners.add(Arc::new(|_: &()| {}));
        drop(listeners);
        sub.unsubscribe();
    }
}
