//! # Run loop: one spawned task per `start`.
//!
//! ```text
//! Poller::start ──► tokio::spawn(Runner::run)
//!
//! while let Some(cycle) = shared.begin_cycle() {      // exits once state != Running
//!   ├─► t0 = clock.now()                  (dynamic policy only)
//!   ├─► attempt (panics caught):
//!   │     ├─ producer.produce(cycle.abort) ──► value
//!   │     ├─ data.emit(&value)             (observers)
//!   │     └─ consumer.consume(value)       (optional)
//!   │
//!   ├─ Ok  ──► if still Running:
//!   │            dynamic: sleep_or_skip(max(0, interval - (now - t0)), cycle.skip)
//!   │            fixed:   sleep_or_skip(interval, cycle.skip)
//!   │
//!   └─ Err ──► error_handler.handle(err)  (Err/panic logged, swallowed)
//!              if still Running: sleep_or_skip(retry_interval, cycle.skip)
//! }
//! ExitGuard::drop ──► shared.finish()     (state = Stopped, release stop waiters)
//! ```
//!
//! ## Rules
//! - Cycles run **sequentially**; the producer is never called concurrently.
//! - A failed cycle never ends the loop; only a stop request does.
//! - No wait is scheduled when a stop arrived while the cycle was producing.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, trace};

use crate::config::PollerConfig;
use crate::core::control::{Cycle, Shared};
use crate::error::{PollError, panic_info};
use crate::signal::{AbortSignal, sleep_or_skip};

/// Drives the cycles of one run with the configuration resolved for that run.
pub(crate) struct Runner<T> {
    shared: Arc<Shared<T>>,
    cfg: PollerConfig<T>,
    run: u64,
}

/// Moves the poller to `Stopped` however the loop ends (return, unwind, runtime drop).
struct ExitGuard<T: Send + 'static>(Arc<Shared<T>>);

impl<T: Send + 'static> Drop for ExitGuard<T> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl<T: Send + 'static> Runner<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>, cfg: PollerConfig<T>, run: u64) -> Self {
        Self { shared, cfg, run }
    }

    /// Runs cycles until the state leaves `Running`.
    pub(crate) async fn run(self) {
        let _exit = ExitGuard(Arc::clone(&self.shared));
        let mut cycle_no: u64 = 0;

        while let Some(cycle) = self.shared.begin_cycle() {
            cycle_no += 1;
            trace!(run = self.run, cycle = cycle_no, "cycle starting");
            self.run_cycle(cycle_no, cycle).await;
        }
    }

    async fn run_cycle(&self, cycle_no: u64, cycle: Cycle) {
        let started = self.cfg.dynamic_interval.then(|| self.cfg.clock.now());

        let outcome = AssertUnwindSafe(self.attempt(cycle.abort.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(PollError::panicked(payload)));

        let delay = match outcome {
            Ok(()) => match started {
                Some(t0) => self
                    .cfg
                    .interval
                    .saturating_sub(self.cfg.clock.elapsed_since(t0)),
                None => self.cfg.interval,
            },
            Err(err) => {
                trace!(run = self.run, cycle = cycle_no, label = err.as_label(), "cycle failed");
                self.report(err).await;
                self.cfg.retry_delay()
            }
        };

        if !self.shared.is_running() {
            return;
        }
        trace!(
            run = self.run,
            cycle = cycle_no,
            delay_ms = delay_ms(delay),
            "waiting for next cycle"
        );
        sleep_or_skip(delay, &cycle.skip).await;
    }

    /// Produces, publishes and consumes one value.
    async fn attempt(&self, abort: AbortSignal) -> Result<(), PollError> {
        let value = self.cfg.producer.produce(abort).await?;
        self.shared.data.emit(&value);
        if let Some(consumer) = &self.cfg.consumer {
            consumer.consume(value).await?;
        }
        Ok(())
    }

    /// Hands `err` to the error handler; handler failures stop here.
    async fn report(&self, err: PollError) {
        let handled = AssertUnwindSafe(self.cfg.error_handler.handle(err))
            .catch_unwind()
            .await;

        match handled {
            Ok(Ok(())) => {}
            Ok(Err(handler_err)) => {
                error!(run = self.run, error = %handler_err, "poller error handler failed");
            }
            Err(payload) => {
                error!(
                    run = self.run,
                    info = %panic_info(payload.as_ref()),
                    "poller error handler panicked"
                );
            }
        }
    }
}

fn delay_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}
