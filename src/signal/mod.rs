//! Interruption primitives used by the run loop.
//!
//! ## Contents
//! - [`AbortSignal`] per-cycle one-shot abort request offered to the producer
//! - [`sleep_or_skip`] inter-cycle wait that a skip token cuts short
//!
//! Both are created fresh for every cycle, so a late signal never leaks into a
//! later cycle.

mod abort;
mod sleep;

pub use abort::AbortSignal;
pub use sleep::{Wake, sleep_or_skip};
