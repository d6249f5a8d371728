//! # Producer abstraction and function-backed implementation.
//!
//! The [`Produce`] trait is the polling subject: it is invoked once per cycle with
//! that cycle's [`AbortSignal`] and yields a value (or a [`PollError`]).
//! [`ProducerFn`] wraps a closure `F: Fn(AbortSignal) -> Fut`, producing a fresh
//! future per cycle. The shared handle type is [`ProducerRef`].
//!
//! ## Example
//! ```rust
//! use pollvisor::{AbortSignal, PollError, ProducerFn, ProducerRef};
//!
//! let p: ProducerRef<u32> = ProducerFn::arc(|_abort: AbortSignal| async {
//!     Ok::<_, PollError>(42)
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::PollError;
use crate::signal::AbortSignal;

/// Boxed future returned by [`Produce::produce`].
pub type BoxProduceFuture<T> = BoxFuture<'static, Result<T, PollError>>;

/// Shared handle to a producer.
pub type ProducerRef<T> = Arc<dyn Produce<T>>;

/// # Asynchronous value source polled by the engine.
///
/// Cycles never overlap: the next `produce` call happens only after the previous
/// future settled. The abort signal is advisory; return
/// [`PollError::Aborted`] (or anything else) to end the cycle early.
pub trait Produce<T>: Send + Sync + 'static {
    /// Starts one production attempt.
    fn produce(&self, abort: AbortSignal) -> BoxProduceFuture<T>;
}

/// Function-backed producer.
///
/// Wraps a closure that *creates* a new future per cycle; shared state across
/// cycles goes into an explicit `Arc<...>` captured by the closure.
#[derive(Debug)]
pub struct ProducerFn<F> {
    f: F,
}

impl<F> ProducerFn<F> {
    /// Creates a new function-backed producer.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the producer and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<T, F, Fut> Produce<T> for ProducerFn<F>
where
    F: Fn(AbortSignal) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, PollError>> + Send + 'static,
{
    fn produce(&self, abort: AbortSignal) -> BoxProduceFuture<T> {
        Box::pin((self.f)(abort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_fresh_future_per_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let producer: ProducerRef<u32> = ProducerFn::arc(move |_abort: AbortSignal| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, PollError>(n) }
        });

        assert_eq!(producer.produce(AbortSignal::new()).await.unwrap(), 1);
        assert_eq!(producer.produce(AbortSignal::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_producer_sees_fired_signal() {
        let producer: ProducerRef<()> = ProducerFn::arc(|abort: AbortSignal| async move {
            match abort.reason() {
                Some(r) if abort.is_aborted() => Err(PollError::aborted(Some(r))),
                _ => Ok::<_, PollError>(()),
            }
        });

        let signal = AbortSignal::new();
        signal.fire(Some("bye!".into()));
        let err = producer.produce(signal).await.unwrap_err();
        assert_eq!(err.to_string(), "aborted: bye!");
    }
}
