//! # Cancellable delay.
//!
//! [`sleep_or_skip`] races a timer against a skip token: whichever completes first
//! wins. The poller seeds it with the cycle's skip token so that `stop` cuts an
//! inter-cycle wait short.

use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

/// How a [`sleep_or_skip`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The full delay elapsed.
    Elapsed,
    /// The skip token was cancelled first.
    Skipped,
}

/// Waits `delay`, or less if `skip` is cancelled (immediately if it already is).
pub async fn sleep_or_skip(delay: Duration, skip: &CancellationToken) -> Wake {
    if skip.is_cancelled() {
        return Wake::Skipped;
    }
    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    select! {
        biased;
        _ = skip.cancelled() => Wake::Skipped,
        _ = &mut sleep => Wake::Elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_full_delay_elapses() {
        let skip = CancellationToken::new();
        let t0 = Instant::now();
        assert_eq!(sleep_or_skip(Duration::from_millis(25), &skip).await, Wake::Elapsed);
        let waited = t0.elapsed();
        assert!(waited >= Duration::from_millis(25) && waited <= Duration::from_millis(26));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_cuts_wait_short() {
        let skip = CancellationToken::new();
        let trigger = skip.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(5)).await;
            trigger.cancel();
        });

        let t0 = Instant::now();
        assert_eq!(sleep_or_skip(Duration::from_secs(60), &skip).await, Wake::Skipped);
        assert!(t0.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_skipped_returns_immediately() {
        let skip = CancellationToken::new();
        skip.cancel();
        let t0 = Instant::now();
        assert_eq!(sleep_or_skip(Duration::from_secs(60), &skip).await, Wake::Skipped);
        assert_eq!(t0.elapsed(), Duration::ZERO);
    }
}
