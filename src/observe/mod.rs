//! Observable outputs of a poller.
//!
//! ## Contents
//! - [`Store`] current value + change listeners (run state)
//! - [`Emitter`] fan-out of produced values (data stream)
//! - [`Subscription`] handle that removes a listener
//!
//! Both deliver synchronously, in subscription order, and only to listeners
//! registered before the notification.

mod emitter;
mod listeners;
mod store;

pub use emitter::Emitter;
pub use listeners::Subscription;
pub use store::Store;
