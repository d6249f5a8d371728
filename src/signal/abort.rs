//! # One-shot abort signal offered to the producer.
//!
//! Every cycle gets a fresh [`AbortSignal`]. It fires **at most once**, carrying an
//! optional reason, and wakes every clone waiting on it. Honouring it is up to the
//! producer: the engine never cancels the producer's future.
//!
//! ## Example
//! ```rust
//! use pollvisor::{AbortSignal, PollError};
//!
//! async fn fetch(abort: AbortSignal) -> Result<u32, PollError> {
//!     tokio::select! {
//!         reason = abort.aborted() => Err(PollError::aborted(reason)),
//!         _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => Ok(200),
//!     }
//! }
//! ```

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// Cloneable one-shot broadcast carrying an optional reason.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<Option<Arc<str>>>>,
}

impl AbortSignal {
    /// Creates an armed signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal with `reason`.
    ///
    /// Returns `false` (and changes nothing) if it already fired.
    pub(crate) fn fire(&self, reason: Option<Arc<str>>) -> bool {
        if self.reason.set(reason).is_err() {
            return false;
        }
        self.token.cancel();
        true
    }

    /// `true` once the signal fired.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason the signal fired with (`None` if armed or fired without a reason).
    pub fn reason(&self) -> Option<Arc<str>> {
        self.reason.get().cloned().flatten()
    }

    /// Resolves when the signal fires, yielding its reason.
    ///
    /// Returns immediately if it already fired.
    pub async fn aborted(&self) -> Option<Arc<str>> {
        self.token.cancelled().await;
        self.reason()
    }

    /// A token cancelled together with this signal, for APIs that take a [`CancellationToken`].
    ///
    /// Cancelling the returned token does not fire the signal.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_at_most_once() {
        let signal = AbortSignal::new();
        assert!(!signal.is_aborted());

        assert!(signal.fire(Some("first".into())));
        assert!(!signal.fire(Some("second".into())));

        assert!(signal.is_aborted());
        assert_eq!(signal.reason().as_deref(), Some("first"));
    }

    #[test]
    fn test_fire_without_reason() {
        let signal = AbortSignal::new();
        assert!(signal.fire(None));
        assert!(signal.is_aborted());
        assert_eq!(signal.reason(), None);
        assert!(!signal.fire(Some("late".into())));
        assert_eq!(signal.reason(), None);
    }

    #[tokio::test]
    async fn test_all_clones_are_woken() {
        let signal = AbortSignal::new();
        let a = signal.clone();
        let b = signal.clone();

        let wa = tokio::spawn(async move { a.aborted().await });
        let wb = tokio::spawn(async move { b.aborted().await });
        tokio::task::yield_now().await;

        signal.fire(Some("bye!".into()));
        assert_eq!(wa.await.unwrap().as_deref(), Some("bye!"));
        assert_eq!(wb.await.unwrap().as_deref(), Some("bye!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_token_follows_signal_but_not_back() {
        let signal = AbortSignal::new();
        let child = signal.child_token();
        child.cancel();
        assert!(!signal.is_aborted());

        let child = signal.child_token();
        signal.fire(None);
        tokio::time::timeout(Duration::from_millis(1), child.cancelled())
            .await
            .expect("child token is cancelled with the signal");
    }
}
