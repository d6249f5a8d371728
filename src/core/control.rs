//! # Engine state shared by the poller handle and its run loop.
//!
//! [`Shared`] owns the state cell, the data stream and the stop bookkeeping.
//! Every state write goes through one of its methods, each of which runs as a
//! single critical section on the control lock (never held across `.await`).
//!
//! ## Transitions
//! ```text
//! begin_run():     Initial/Stopped ──► Running      (caller spawns the loop)
//!                  Stopping        ──► wait on the pending stop latch, retry
//!                  Running         ──► no-op
//!
//! request_stop():  Running  ──► Stopping, fire skip (+ abort), arm new latch
//!                  Stopping ──► join latch (+ abort if the cycle's signal is still live)
//!                  Initial/Stopped ──► no-op
//!
//! begin_cycle():   Running ──► fresh skip token + abort signal for the cycle
//!                  otherwise ──► None (the loop exits)
//!
//! finish():        any ──► Stopped, drop cycle tokens, release latch waiters
//! ```
//!
//! ## Rules
//! - Cycle tokens are **recreated per cycle**; a stale signal never reaches a later cycle.
//! - An abort signal is taken out of the slot when fired: at most one delivery per cycle.
//! - All `stop`/`abort` callers during one shutdown join the **same** latch.
//! - A panicking state listener never interrupts a transition (listener panics are logged).

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PollerConfig;
use crate::error::panic_info;
use crate::observe::{Emitter, Store};
use crate::signal::AbortSignal;
use crate::state::PollerState;

/// How a stop request treats the in-flight producer.
#[derive(Debug, Clone)]
pub(crate) enum StopMode {
    /// Let the producer finish; only skip the pending wait.
    Graceful,
    /// Also fire the cycle's abort signal with the given reason.
    Abort(Option<Arc<str>>),
}

/// Outcome of [`Shared::begin_run`].
pub(crate) enum Launch {
    /// A loop is already active.
    AlreadyRunning,
    /// A shutdown is in flight; wait on the latch and try again.
    Wait(CancellationToken),
    /// State moved to `Running`; the caller must spawn run number `.0`.
    Started(u64),
}

/// Interruption handles of the live cycle, held by the engine.
struct CycleTokens {
    skip: CancellationToken,
    abort: Option<AbortSignal>,
}

/// Interruption handles of the live cycle, held by the loop.
pub(crate) struct Cycle {
    pub(crate) skip: CancellationToken,
    pub(crate) abort: AbortSignal,
}

struct Control {
    /// Cancelled when the current shutdown completes; replaced on every new shutdown.
    stop_done: CancellationToken,
    cycle: Option<CycleTokens>,
    runs: u64,
}

/// State shared by a [`Poller`](crate::Poller) and its run loop.
pub(crate) struct Shared<T> {
    pub(crate) config: PollerConfig<T>,
    pub(crate) state: Store<PollerState>,
    pub(crate) data: Emitter<T>,
    control: Mutex<Control>,
}

impl<T: Send + 'static> Shared<T> {
    pub(crate) fn new(config: PollerConfig<T>) -> Self {
        Self {
            config,
            state: Store::new(PollerState::Initial),
            data: Emitter::new(),
            control: Mutex::new(Control {
                stop_done: CancellationToken::new(),
                cycle: None,
                runs: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `next` and notifies state listeners, containing listener panics.
    ///
    /// The value is stored before listeners run, so a panic only cuts the
    /// notification short; the caller's bookkeeping still completes.
    fn publish(&self, next: PollerState) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.state.set(next))) {
            warn!(
                state = next.as_label(),
                info = %panic_info(payload.as_ref()),
                "state listener panicked"
            );
        }
    }

    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.state.get() == PollerState::Running
    }

    /// Moves an idle poller to `Running`.
    pub(crate) fn begin_run(&self) -> Launch {
        let mut ctl = self.lock();
        match self.state.get() {
            PollerState::Running => Launch::AlreadyRunning,
            PollerState::Stopping => Launch::Wait(ctl.stop_done.clone()),
            PollerState::Initial | PollerState::Stopped => {
                ctl.runs += 1;
                ctl.cycle = None;
                self.publish(PollerState::Running);
                debug!(run = ctl.runs, "poller running");
                Launch::Started(ctl.runs)
            }
        }
    }

    /// Issues (or joins) a shutdown. Returns the latch to wait on, `None` if idle.
    pub(crate) fn request_stop(&self, mode: StopMode) -> Option<CancellationToken> {
        let mut ctl = self.lock();
        match self.state.get() {
            PollerState::Initial | PollerState::Stopped => return None,
            PollerState::Stopping => {}
            PollerState::Running => {
                ctl.stop_done = CancellationToken::new();
                self.publish(PollerState::Stopping);
                if let Some(cycle) = &ctl.cycle {
                    cycle.skip.cancel();
                }
                debug!(run = ctl.runs, "poller stopping");
            }
        }

        if let StopMode::Abort(reason) = mode {
            if let Some(signal) = ctl.cycle.as_mut().and_then(|c| c.abort.take()) {
                debug!(run = ctl.runs, reason = reason.as_deref(), "abort signal fired");
                signal.fire(reason);
            }
        }
        Some(ctl.stop_done.clone())
    }

    /// Allocates the next cycle's tokens, or `None` if the loop must exit.
    pub(crate) fn begin_cycle(&self) -> Option<Cycle> {
        let mut ctl = self.lock();
        if self.state.get() != PollerState::Running {
            return None;
        }
        let skip = CancellationToken::new();
        let abort = AbortSignal::new();
        ctl.cycle = Some(CycleTokens {
            skip: skip.clone(),
            abort: Some(abort.clone()),
        });
        Some(Cycle { skip, abort })
    }

    /// Marks the loop as exited and releases everyone waiting on the shutdown.
    pub(crate) fn finish(&self) {
        let mut ctl = self.lock();
        let previous = self.state.get();
        if previous == PollerState::Running {
            warn!(run = ctl.runs, "poller loop ended without a stop request");
        }
        ctl.cycle = None;
        self.publish(PollerState::Stopped);
        ctl.stop_done.cancel();
        debug!(run = ctl.runs, "poller stopped");
    }
}
