use std::time::Duration;

use crate::clock::Clock;
use crate::config::PollerConfig;
use crate::handlers::{ConsumerRef, ErrorHandlerRef, ProducerRef};

use super::poller::Poller;

/// Builder for constructing a [`Poller`] with optional settings.
pub struct PollerBuilder<T> {
    cfg: PollerConfig<T>,
}

impl<T: Send + 'static> PollerBuilder<T> {
    /// Creates a new builder for `producer` polled every `interval`.
    pub fn new(producer: ProducerRef<T>, interval: Duration) -> Self {
        Self {
            cfg: PollerConfig::new(producer, interval),
        }
    }

    /// Sets an async sink awaited with every produced value.
    pub fn with_consumer(mut self, consumer: ConsumerRef<T>) -> Self {
        self.cfg.consumer = Some(consumer);
        self
    }

    /// Replaces the default logging error handler.
    pub fn with_error_handler(mut self, handler: ErrorHandlerRef) -> Self {
        self.cfg.error_handler = handler;
        self
    }

    /// Sets the wait after a failed cycle (defaults to the interval).
    pub fn with_retry_interval(mut self, retry: Duration) -> Self {
        self.cfg.retry_interval = Some(retry);
        self
    }

    /// Chooses between the dynamic (`true`, default) and fixed interval policy.
    pub fn with_dynamic_interval(mut self, dynamic: bool) -> Self {
        self.cfg.dynamic_interval = dynamic;
        self
    }

    /// Replaces the monotonic time source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.cfg.clock = clock;
        self
    }

    /// Builds the poller in the `Initial` state.
    pub fn build(self) -> Poller<T> {
        Poller::new(self.cfg)
    }
}
