//! # User-supplied behaviour plugged into the poller.
//!
//! - [`Produce`] / [`ProducerFn`] / [`ProducerRef`]: the polling subject
//! - [`Consume`] / [`ConsumerFn`] / [`ConsumerRef`]: optional async sink for produced values
//! - [`HandleError`] / [`ErrorHandlerFn`] / [`ErrorHandlerRef`]: cycle failure handling,
//!   [`LogErrorHandler`] by default

mod consumer;
mod error_handler;
mod producer;

pub use consumer::{Consume, ConsumerFn, ConsumerRef};
pub use error_handler::{ErrorHandlerFn, ErrorHandlerRef, HandleError, LogErrorHandler};
pub use producer::{BoxProduceFuture, Produce, ProducerFn, ProducerRef};
