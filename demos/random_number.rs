//! # Example: random_number
//!
//! Polls a slow "remote" random number source every 500ms and stops after 5s.
//!
//! The producer takes about a second, longer than the interval, so with the
//! dynamic interval policy cycles run back to back. A failure every few calls
//! shows the retry interval and the error handler at work.
//!
//! ## Flow
//! ```text
//! Poller::start()
//!   ├─► produce() ~1s → Ok(n)  ──► data observers ──► wait max(0, 500ms - 1s) = 0
//!   ├─► produce() ~1s → Err    ──► error handler  ──► wait retry (250ms)
//!   └─► ...
//! Poller::stop() after 5s ──► in-flight call finishes ──► Stopped
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=pollvisor=debug cargo run --example random_number
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use rand::Rng;
use tracing_subscriber::EnvFilter;

use pollvisor::{
    AbortSignal, ErrorHandlerFn, PollError, Poller, PollerState, ProducerFn, ProducerRef,
};

/// Simulated remote call: ~1s latency, fails on every fourth call.
fn remote_random() -> ProducerRef<u32> {
    let calls = Arc::new(AtomicU32::new(0));
    ProducerFn::arc(move |abort: AbortSignal| {
        let call = calls.fetch_add(1, Ordering::Relaxed) + 1;
        let value: u32 = rand::rng().random_range(0..100);
        async move {
            tokio::select! {
                reason = abort.aborted() => Err(PollError::aborted(reason)),
                _ = tokio::time::sleep(Duration::from_secs(1)) => {
                    if call % 4 == 0 {
                        Err(PollError::fail(format!("call #{call} timed out")))
                    } else {
                        Ok(value)
                    }
                }
            }
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let poller = Poller::builder(remote_random(), Duration::from_millis(500))
        .with_retry_interval(Duration::from_millis(250))
        .with_error_handler(ErrorHandlerFn::arc(|err: PollError| async move {
            println!("[handler] {err}");
            Ok::<_, PollError>(())
        }))
        .build();

    let _state = poller
        .state_store()
        .subscribe(|s: &PollerState| println!("[state] {s}"));
    let _data = poller
        .data()
        .subscribe(|n: &u32| println!("[data] random number: {n}"));

    poller.start().await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    poller.stop().await;

    println!("final state: {}", poller.state());
    Ok(())
}
