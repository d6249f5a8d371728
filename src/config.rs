//! # Poller configuration.
//!
//! Provides [`PollerConfig`], the defaults captured when a poller is built, and
//! [`Overrides`], a partial record applied to a single run.
//!
//! Config is used in two ways:
//! 1. **Poller creation**: `Poller::new(config)` / `Poller::builder(producer, interval)`
//! 2. **Per-run overrides**: `start_with(overrides)` / `restart_with(overrides)` resolve
//!    `config.merged(overrides)` for that run only; the stored defaults never change.
//!
//! ## Sentinel values
//! - `retry_interval = None` → retry waits use `interval`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::handlers::{ConsumerRef, ErrorHandlerRef, LogErrorHandler, ProducerRef};

/// Configuration of a poller.
///
/// ## Field semantics
/// - `producer`: polling subject, called once per cycle
/// - `consumer`: optional async sink awaited with each produced value
/// - `error_handler`: receives every cycle failure (default: [`LogErrorHandler`])
/// - `interval`: time between cycles (see `dynamic_interval`)
/// - `retry_interval`: wait after a failed cycle (`None` = `interval`)
/// - `dynamic_interval`: `true` = `interval` spans producer start to producer start;
///   `false` = `interval` is a fixed pause added after each cycle
/// - `clock`: monotonic time source for the dynamic policy
pub struct PollerConfig<T> {
    /// The polling subject.
    pub producer: ProducerRef<T>,

    /// Optional sink awaited with every produced value.
    ///
    /// Runs after data observers were notified; its time counts against
    /// the dynamic interval and its failure fails the cycle.
    pub consumer: Option<ConsumerRef<T>>,

    /// Receives every cycle failure.
    pub error_handler: ErrorHandlerRef,

    /// Time between cycles.
    ///
    /// With `dynamic_interval = true`, the wait after a cycle is
    /// `interval - (time spent producing and publishing)`, floored at zero.
    pub interval: Duration,

    /// Wait after a failed cycle (`None` = `interval`).
    pub retry_interval: Option<Duration>,

    /// Selects the dynamic (default) or fixed interval policy.
    pub dynamic_interval: bool,

    /// Monotonic time source for the dynamic policy.
    pub clock: Clock,
}

impl<T> PollerConfig<T> {
    /// Creates a configuration with defaults for every optional field:
    ///
    /// - `consumer = None`
    /// - `error_handler = LogErrorHandler`
    /// - `retry_interval = None` (falls back to `interval`)
    /// - `dynamic_interval = true`
    /// - `clock = Clock::monotonic()`
    pub fn new(producer: ProducerRef<T>, interval: Duration) -> Self {
        Self {
            producer,
            consumer: None,
            error_handler: Arc::new(LogErrorHandler),
            interval,
            retry_interval: None,
            dynamic_interval: true,
            clock: Clock::monotonic(),
        }
    }

    /// Returns the wait applied after a failed cycle.
    #[inline]
    pub fn retry_delay(&self) -> Duration {
        self.retry_interval.unwrap_or(self.interval)
    }

    /// Resolves the configuration of one run: every field set in `overrides`
    /// replaces the stored one, the rest is kept.
    pub fn merged(&self, overrides: Overrides<T>) -> Self {
        Self {
            producer: overrides
                .producer
                .unwrap_or_else(|| Arc::clone(&self.producer)),
            consumer: overrides.consumer.or_else(|| self.consumer.clone()),
            error_handler: overrides
                .error_handler
                .unwrap_or_else(|| Arc::clone(&self.error_handler)),
            interval: overrides.interval.unwrap_or(self.interval),
            retry_interval: overrides.retry_interval.or(self.retry_interval),
            dynamic_interval: overrides.dynamic_interval.unwrap_or(self.dynamic_interval),
            clock: overrides.clock.unwrap_or_else(|| self.clock.clone()),
        }
    }
}

impl<T> Clone for PollerConfig<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
            consumer: self.consumer.clone(),
            error_handler: Arc::clone(&self.error_handler),
            interval: self.interval,
            retry_interval: self.retry_interval,
            dynamic_interval: self.dynamic_interval,
            clock: self.clock.clone(),
        }
    }
}

impl<T> fmt::Debug for PollerConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollerConfig")
            .field("interval", &self.interval)
            .field("retry_interval", &self.retry_interval)
            .field("dynamic_interval", &self.dynamic_interval)
            .field("has_consumer", &self.consumer.is_some())
            .finish_non_exhaustive()
    }
}

/// Partial configuration applied to a single run.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use pollvisor::Overrides;
///
/// let slower: Overrides<u32> = Overrides::new().with_interval(Duration::from_millis(40));
/// assert_eq!(slower.interval, Some(Duration::from_millis(40)));
/// ```
pub struct Overrides<T> {
    pub producer: Option<ProducerRef<T>>,
    pub consumer: Option<ConsumerRef<T>>,
    pub error_handler: Option<ErrorHandlerRef>,
    pub interval: Option<Duration>,
    pub retry_interval: Option<Duration>,
    pub dynamic_interval: Option<bool>,
    pub clock: Option<Clock>,
}

impl<T> Overrides<T> {
    /// Empty override set (the run uses the stored configuration).
    pub fn new() -> Self {
        Self {
            producer: None,
            consumer: None,
            error_handler: None,
            interval: None,
            retry_interval: None,
            dynamic_interval: None,
            clock: None,
        }
    }

    pub fn with_producer(mut self, producer: ProducerRef<T>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn with_consumer(mut self, consumer: ConsumerRef<T>) -> Self {
        self.consumer = Some(consumer);
        self
    }

    pub fn with_error_handler(mut self, handler: ErrorHandlerRef) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_retry_interval(mut self, retry: Duration) -> Self {
        self.retry_interval = Some(retry);
        self
    }

    pub fn with_dynamic_interval(mut self, dynamic: bool) -> Self {
        self.dynamic_interval = Some(dynamic);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<T> Default for Overrides<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollError;
    use crate::handlers::ProducerFn;
    use crate::signal::AbortSignal;

    fn producer(n: u32) -> ProducerRef<u32> {
        ProducerFn::arc(move |_abort: AbortSignal| async move { Ok::<_, PollError>(n) })
    }

    #[test]
    fn test_defaults() {
        let cfg = PollerConfig::new(producer(1), Duration::from_millis(10));
        assert!(cfg.dynamic_interval);
        assert!(cfg.consumer.is_none());
        assert_eq!(cfg.retry_interval, None);
        assert_eq!(cfg.retry_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let mut cfg = PollerConfig::new(producer(1), Duration::from_millis(10));
        cfg.retry_interval = Some(Duration::from_millis(3));
        cfg.dynamic_interval = false;

        let run = cfg.merged(Overrides::default());
        assert_eq!(run.interval, Duration::from_millis(10));
        assert_eq!(run.retry_delay(), Duration::from_millis(3));
        assert!(!run.dynamic_interval);
        assert!(Arc::ptr_eq(&run.producer, &cfg.producer));
    }

    #[tokio::test]
    async fn test_overrides_apply_without_touching_defaults() {
        let cfg = PollerConfig::new(producer(1), Duration::from_millis(10));
        let run = cfg.merged(
            Overrides::new()
                .with_producer(producer(2))
                .with_interval(Duration::from_millis(40))
                .with_retry_interval(Duration::from_millis(5))
                .with_dynamic_interval(false)
                .with_clock(Clock::from_fn(|| Duration::ZERO)),
        );

        assert_eq!(run.interval, Duration::from_millis(40));
        assert_eq!(run.retry_delay(), Duration::from_millis(5));
        assert!(!run.dynamic_interval);
        assert_eq!(run.clock.now(), Duration::ZERO);
        assert_eq!(run.producer.produce(AbortSignal::new()).await.unwrap(), 2);

        assert_eq!(cfg.interval, Duration::from_millis(10));
        assert_eq!(cfg.retry_interval, None);
        assert!(cfg.dynamic_interval);
        assert_eq!(cfg.producer.produce(AbortSignal::new()).await.unwrap(), 1);
    }
}
