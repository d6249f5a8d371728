//! # Error handlers.
//!
//! A [`HandleError`] receives every [`PollError`] raised by a cycle. It may be
//! slow, fail (`Err`) or even panic: the engine catches both, logs them and keeps
//! polling.
//!
//! [`LogErrorHandler`] is the default: it writes the error through `tracing`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::error::PollError;

/// Shared handle to an error handler.
pub type ErrorHandlerRef = Arc<dyn HandleError>;

/// Contract for cycle error handlers.
#[async_trait]
pub trait HandleError: Send + Sync + 'static {
    /// Handles one cycle failure.
    ///
    /// Returning `Err` is logged and otherwise ignored.
    async fn handle(&self, err: PollError) -> Result<(), PollError>;
}

/// Function-backed error handler.
#[derive(Debug)]
pub struct ErrorHandlerFn<F> {
    f: F,
}

impl<F> ErrorHandlerFn<F> {
    /// Creates a new function-backed handler.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> HandleError for ErrorHandlerFn<F>
where
    F: Fn(PollError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PollError>> + Send + 'static,
{
    async fn handle(&self, err: PollError) -> Result<(), PollError> {
        (self.f)(err).await
    }
}

/// Default handler: logs the error and lets the poller continue.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorHandler;

#[async_trait]
impl HandleError for LogErrorHandler {
    async fn handle(&self, err: PollError) -> Result<(), PollError> {
        error!(error = %err, label = err.as_label(), "an error occurred while polling");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_log_handler_swallows() {
        assert!(LogErrorHandler.handle(PollError::fail("boom")).await.is_ok());
    }

    #[tokio::test]
    async fn test_fn_handler_receives_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler: ErrorHandlerRef = ErrorHandlerFn::arc(move |err: PollError| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                assert_eq!(err.to_string(), "produce failed: catch me!");
                Ok::<_, PollError>(())
            }
        });

        handler.handle(PollError::fail("catch me!")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
