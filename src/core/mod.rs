//! Engine core: lifecycle control and the run loop.
//!
//! The only public API from this module is [`Poller`] (and its [`PollerBuilder`]).
//!
//! Internal modules:
//! - [`control`]: state machine and stop/abort bookkeeping shared with the loop;
//! - [`runner`]: executes cycles (produce, publish, consume, wait);
//! - [`poller`]: public handle that starts, stops and restarts runs;
//! - [`builder`]: fluent construction of a poller.

mod builder;
mod control;
mod poller;
mod runner;

pub use builder::PollerBuilder;
pub use poller::Poller;
