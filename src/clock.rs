//! # Monotonic time source used by the dynamic interval policy.
//!
//! A [`Clock`] returns the time elapsed since an arbitrary, fixed epoch. Only
//! differences between two readings matter.
//!
//! The default ([`Clock::monotonic`]) reads [`tokio::time::Instant`], so it follows
//! paused/advanced time in tests driven by `tokio::time::pause`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Cloneable monotonic time accessor.
#[derive(Clone)]
pub struct Clock {
    now: Arc<dyn Fn() -> Duration + Send + Sync>,
}

impl Clock {
    /// Platform monotonic clock, measured from the moment the clock is created.
    pub fn monotonic() -> Self {
        let epoch = Instant::now();
        Self::from_fn(move || epoch.elapsed())
    }

    /// Wraps a custom time source.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use pollvisor::Clock;
    ///
    /// let frozen = Clock::from_fn(|| Duration::ZERO);
    /// assert_eq!(frozen.now(), Duration::ZERO);
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Duration + Send + Sync + 'static,
    {
        Self { now: Arc::new(f) }
    }

    /// Current reading.
    #[inline]
    pub fn now(&self) -> Duration {
        (self.now)()
    }

    /// Time passed since `earlier`, clamped at zero for sources that go backwards.
    #[inline]
    pub fn elapsed_since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::monotonic()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_elapsed_saturates_on_backwards_source() {
        let ticks = Arc::new(AtomicU64::new(10));
        let source = Arc::clone(&ticks);
        let clock = Clock::from_fn(move || Duration::from_millis(source.load(Ordering::Relaxed)));

        let t0 = clock.now();
        ticks.store(4, Ordering::Relaxed);
        assert_eq!(clock.elapsed_since(t0), Duration::ZERO);

        ticks.store(25, Ordering::Relaxed);
        assert_eq!(clock.elapsed_since(t0), Duration::from_millis(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_monotonic_follows_paused_time() {
        let clock = Clock::monotonic();
        let t0 = clock.now();
        tokio::time::advance(Duration::from_millis(30)).await;
        assert_eq!(clock.elapsed_since(t0), Duration::from_millis(30));
    }
}
