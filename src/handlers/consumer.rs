//! # Optional sink awaited with every produced value.
//!
//! A consumer runs after the data observers were notified and before the
//! inter-cycle wait is computed, so its duration counts against the dynamic
//! interval. A failing consumer fails the cycle.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PollError;

/// Shared handle to a consumer.
pub type ConsumerRef<T> = Arc<dyn Consume<T>>;

/// Asynchronous handler of produced values.
#[async_trait]
pub trait Consume<T>: Send + Sync + 'static {
    /// Handles one produced value.
    async fn consume(&self, value: T) -> Result<(), PollError>;
}

/// Function-backed consumer.
#[derive(Debug)]
pub struct ConsumerFn<F> {
    f: F,
}

impl<F> ConsumerFn<F> {
    /// Creates a new function-backed consumer.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the consumer and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, F, Fut> Consume<T> for ConsumerFn<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PollError>> + Send + 'static,
{
    async fn consume(&self, value: T) -> Result<(), PollError> {
        (self.f)(value).await
    }
}
