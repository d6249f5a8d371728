//! # Poller: public handle over the engine.
//!
//! A [`Poller`] is created once and reused across any number of
//! `start`/`stop`/`restart` runs. Clones share the same engine.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{AbortSignal, PollError, Poller, PollerState, ProducerFn, ProducerRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let status: ProducerRef<u16> =
//!         ProducerFn::arc(|_abort: AbortSignal| async { Ok::<_, PollError>(200) });
//!     let poller = Poller::builder(status, Duration::from_millis(500)).build();
//!
//!     let _sub = poller.data().subscribe(|status: &u16| println!("status: {status}"));
//!
//!     poller.start().await;
//!     assert_eq!(poller.state(), PollerState::Running);
//!
//!     poller.stop().await;
//!     assert_eq!(poller.state(), PollerState::Stopped);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Overrides, PollerConfig};
use crate::handlers::ProducerRef;
use crate::observe::{Emitter, Store};
use crate::state::PollerState;

use super::builder::PollerBuilder;
use super::control::{Launch, Shared, StopMode};
use super::runner::Runner;

/// Recurring-task driver with race-free lifecycle control.
///
/// ### Rules
/// - At most **one** run loop is active per poller.
/// - Every operation is safe in every state (no-op where it does not apply).
/// - Overrides passed to `start_with`/`restart_with` last for that run only.
pub struct Poller<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Poller<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Poller<T> {
    /// Creates a poller in the `Initial` state.
    pub fn new(config: PollerConfig<T>) -> Self {
        Self {
            shared: Arc::new(Shared::new(config)),
        }
    }

    /// Starts building a poller for `producer` polled every `interval`.
    pub fn builder(producer: ProducerRef<T>, interval: Duration) -> PollerBuilder<T> {
        PollerBuilder::new(producer, interval)
    }

    /// Current state.
    pub fn state(&self) -> PollerState {
        self.shared.state.get()
    }

    /// Observable state; listeners see every transition.
    pub fn state_store(&self) -> &Store<PollerState> {
        &self.shared.state
    }

    /// Stream of produced values.
    pub fn data(&self) -> &Emitter<T> {
        &self.shared.data
    }

    /// Stored default configuration.
    pub fn config(&self) -> &PollerConfig<T> {
        &self.shared.config
    }

    /// Starts the loop with the stored configuration.
    ///
    /// Resolves once the state is `Running` (before the first cycle completes).
    pub async fn start(&self) {
        self.start_with(Overrides::default()).await;
    }

    /// Starts the loop with `overrides` applied to this run only.
    ///
    /// - `Running`: no-op (the overrides are ignored).
    /// - `Stopping`: waits for the shutdown in flight, then starts.
    /// - `Initial`/`Stopped`: starts immediately.
    pub async fn start_with(&self, overrides: Overrides<T>) {
        let mut overrides = Some(overrides);
        loop {
            match self.shared.begin_run() {
                Launch::AlreadyRunning => return,
                Launch::Wait(done) => done.cancelled().await,
                Launch::Started(run) => {
                    let cfg = self
                        .shared
                        .config
                        .merged(overrides.take().unwrap_or_default());
                    tokio::spawn(Runner::new(Arc::clone(&self.shared), cfg, run).run());
                    return;
                }
            }
        }
    }

    /// Stops the loop, letting an in-flight producer call finish.
    ///
    /// A pending wait is cut short. Resolves once the state is `Stopped`;
    /// concurrent callers all join the same shutdown.
    pub async fn stop(&self) {
        if let Some(done) = self.shared.request_stop(StopMode::Graceful) {
            done.cancelled().await;
        }
    }

    /// Like [`stop`](Self::stop), and also fires the current cycle's abort signal
    /// with `reason` (at most once per cycle).
    pub async fn abort(&self, reason: Option<Arc<str>>) {
        if let Some(done) = self.shared.request_stop(StopMode::Abort(reason)) {
            done.cancelled().await;
        }
    }

    /// `stop` followed by `start`.
    pub async fn restart(&self) {
        self.restart_with(Overrides::default()).await;
    }

    /// `stop` followed by `start_with(overrides)`.
    pub async fn restart_with(&self, overrides: Overrides<T>) {
        self.stop().await;
        self.start_with(overrides).await;
    }
}
