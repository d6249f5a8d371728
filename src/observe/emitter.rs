//! # Value-less event stream.
//!
//! [`Emitter`] forwards each emitted value to its listeners without retaining it.
//! The poller publishes every produced value through one.

use std::fmt;
use std::sync::Arc;

use super::listeners::{Listeners, Subscription};

/// Synchronous fan-out of values to listeners.
pub struct Emitter<T> {
    listeners: Listeners<T>,
}

impl<T: 'static> Emitter<T> {
    /// Creates an emitter without listeners.
    pub fn new() -> Self {
        Self {
            listeners: Listeners::new(),
        }
    }

    /// Delivers `value` to every listener, in subscription order.
    ///
    /// A panicking listener unwinds through this call; listeners after it are skipped.
    pub fn emit(&self, value: &T) {
        self.listeners.notify(value);
    }

    /// Registers a listener for future emissions.
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

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_every_listener() {
        let emitter = Emitter::<usize>::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = Arc::clone(&total);
            let _ = emitter.subscribe(move |v: &usize| {
                total.fetch_add(*v, Ordering::SeqCst);
            });
        }
        emitter.emit(&2);

        assert_eq!(total.load(Ordering::SeqCst), 6);
        assert_eq!(emitter.subscriber_count(), 3);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        Emitter::<String>::default().emit(&"nobody".to_string());
    }
}
