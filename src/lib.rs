//! # pollvisor
//!
//! **Pollvisor** runs an asynchronous producer on a recurring schedule and
//! publishes what it produces.
//!
//! A [`Poller`] owns one run loop at a time and exposes an observable run state
//! ([`PollerState`]) plus a data stream of produced values. Lifecycle operations
//! (`start`, `stop`, `abort`, `restart`) are safe to call in any state and from
//! any number of tasks at once.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐  start / stop / abort / restart  ┌──────────────────────┐
//!  │ Poller (any  │ ───────────────────────────────► │ Shared (control lock)│
//!  │ clone/task)  │ ◄──────── stop latch ─────────── │  - Store<PollerState>│
//!  └──────────────┘                                  │  - Emitter<T>        │
//!                                                    │  - cycle tokens      │
//!                                                    └──────────┬───────────┘
//!                                                               ▼
//!                                                 ┌────────────────────────┐
//!                                                 │ Runner (tokio::spawn)  │
//!                                                 │ one per Running period │
//!                                                 └──┬──────────┬──────────┘
//!                                                    ▼          ▼
//!                                          Produce::produce   HandleError::handle
//!                                          (AbortSignal)      (on failures)
//!                                                    │
//!                                                    ▼
//!                                          Emitter::emit ──► observers
//!                                          Consume::consume (optional)
//! ```
//!
//! ### Lifecycle
//! ```text
//!   Initial ──start──► Running ──stop/abort──► Stopping ──loop exit──► Stopped
//!                         ▲                                              │
//!                         └──────────────────start───────────────────────┘
//! ```
//!
//! ### Cycle
//! ```text
//! loop while Running {
//!   ├─► fresh skip token + abort signal
//!   ├─► value = producer.produce(abort)
//!   │       ├─ Ok  ──► emit(value) ──► consumer(value) ──► wait interval
//!   │       └─ Err ──► error_handler(err)              ──► wait retry_interval
//!   └─► wait is cut short by stop/abort (skip token)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Lifecycle**     | Race-free start/stop/abort/restart over a single run loop.   | [`Poller`], [`PollerState`]                 |
//! | **Scheduling**    | Dynamic or fixed interval, separate retry interval.          | [`PollerConfig`], [`Overrides`], [`Clock`]  |
//! | **Handlers**      | Producer, optional consumer and error handler seams.         | [`Produce`], [`Consume`], [`HandleError`]   |
//! | **Observation**   | Current state with change listeners, data fan-out.           | [`Store`], [`Emitter`], [`Subscription`]    |
//! | **Interruption**  | Per-cycle abort signal and skippable waits.                  | [`AbortSignal`], [`sleep_or_skip`]          |
//! | **Errors**        | Typed cycle failures.                                        | [`PollError`]                               |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{AbortSignal, PollError, Poller, PollerState, ProducerFn, ProducerRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let answer: ProducerRef<u32> = ProducerFn::arc(|abort: AbortSignal| async move {
//!         if abort.is_aborted() {
//!             return Err(PollError::aborted(abort.reason()));
//!         }
//!         Ok(42)
//!     });
//!
//!     let poller = Poller::builder(answer, Duration::from_millis(100))
//!         .with_retry_interval(Duration::from_millis(500))
//!         .build();
//!
//!     let _state = poller
//!         .state_store()
//!         .subscribe(|s: &PollerState| println!("state: {s}"));
//!     let _data = poller.data().subscribe(|v: &u32| println!("value: {v}"));
//!
//!     poller.start().await;
//!     tokio::time::sleep(Duration::from_millis(250)).await;
//!     poller.abort(Some("shutting down".into())).await;
//!     assert_eq!(poller.state(), PollerState::Stopped);
//! }
//! ```
mod clock;
mod config;
mod core;
mod error;
mod handlers;
mod observe;
mod signal;
mod state;

// ---- Public re-exports ----

pub use clock::Clock;
pub use config::{Overrides, PollerConfig};
pub use core::{Poller, PollerBuilder};
pub use error::PollError;
pub use handlers::{
    BoxProduceFuture, Consume, ConsumerFn, ConsumerRef, ErrorHandlerFn, ErrorHandlerRef,
    HandleError, LogErrorHandler, Produce, ProducerFn, ProducerRef,
};
pub use observe::{Emitter, Store, Subscription};
pub use signal::{AbortSignal, Wake, sleep_or_skip};
pub use state::PollerState;
