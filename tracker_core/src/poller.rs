//! Background telemetry polling.
//!
//! Spawns a thread that owns the device, fetches `/v1/temp/raw` once per
//! interval, and hands raw payloads to the session over a bounded channel.
//! The session thread is the only one that mutates dashboard state.
//!
//! The fetch runs synchronously on the poller thread, so at most one
//! telemetry request is ever outstanding. Ticks that elapse while a fetch is
//! in flight are skipped, never queued.
//!
//! Safety: Each `Poller` spawns exactly one thread that is shut down and
//! joined when the `Poller` is dropped, so no payload is produced for a
//! torn-down session. Retry backoff waits on the shutdown channel too, so
//! joining blocks for at most one in-flight request (the HTTP timeout).
use crate::config::{PollCfg, RetryPolicy};
use crate::sync::DeviceSyncClient;
use crossbeam_channel as xch;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracker_traits::DeviceApi;
use tracker_traits::clock::Clock;

#[derive(Debug, Default)]
struct Counters {
    fetched: AtomicU64,
    failed: AtomicU64,
    skipped_ticks: AtomicU64,
    dropped_payloads: AtomicU64,
}

/// Point-in-time copy of the poller counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Successful telemetry fetches.
    pub fetched: u64,
    /// Fetches that failed after all retries.
    pub failed: u64,
    /// Ticks skipped because a fetch was still in flight.
    pub skipped_ticks: u64,
    /// Payloads dropped because the session was behind.
    pub dropped_payloads: u64,
}

pub struct Poller {
    rx: xch::Receiver<Value>,
    counters: Arc<Counters>,
    /// Dropping the sender wakes the thread immediately.
    shutdown_tx: Option<xch::Sender<()>>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Poller {
    pub fn spawn<D, C>(device: D, cfg: PollCfg, policy: RetryPolicy, clock: C) -> Self
    where
        D: DeviceApi + Send + 'static,
        C: Clock + Clone + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(cfg.channel_depth.max(1));
        let (shutdown_tx, shutdown_rx) = xch::bounded::<()>(0);
        let counters = Arc::new(Counters::default());
        let counters_bg = counters.clone();
        let period = cfg.interval.max(Duration::from_millis(1));

        tracing::info!(
            interval_ms = crate::util::duration_ms(period),
            rate_hz = crate::util::rate_hz(period),
            "telemetry poller starting"
        );

        let join_handle = std::thread::spawn(move || {
            let mut client = DeviceSyncClient::with_clock(device, policy, clock.clone());
            let mut next_tick = clock.now();
            loop {
                let wait = next_tick.saturating_duration_since(clock.now());
                match shutdown_rx.recv_timeout(wait) {
                    Err(xch::RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => {
                        tracing::debug!("Poller thread received shutdown signal");
                        break;
                    }
                }

                let fetched = client.fetch_telemetry_while(|delay| {
                    matches!(
                        shutdown_rx.recv_timeout(delay),
                        Err(xch::RecvTimeoutError::Timeout)
                    )
                });
                match fetched {
                    Ok(payload) => {
                        counters_bg.fetched.fetch_add(1, Ordering::Relaxed);
                        match tx.try_send(payload) {
                            Ok(()) => {}
                            Err(xch::TrySendError::Full(_)) => {
                                counters_bg.dropped_payloads.fetch_add(1, Ordering::Relaxed);
                                tracing::debug!("session behind; dropping telemetry payload");
                            }
                            Err(xch::TrySendError::Disconnected(_)) => {
                                tracing::debug!("Poller consumer disconnected, exiting thread");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        counters_bg.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(error = %e, "telemetry fetch failed; keeping previous state");
                    }
                }

                next_tick += period;
                let now = clock.now();
                while next_tick <= now {
                    next_tick += period;
                    counters_bg.skipped_ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
            tracing::trace!("Poller thread exiting cleanly");
        });

        Self {
            rx,
            counters,
            shutdown_tx: Some(shutdown_tx),
            join_handle: Some(join_handle),
        }
    }

    /// Next pending payload, if any.
    pub fn try_recv(&self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next payload.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Value> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// All payloads pending right now, oldest first.
    pub fn drain(&self) -> Vec<Value> {
        self.rx.try_iter().collect()
    }

    pub fn stats(&self) -> PollStats {
        PollStats {
            fetched: self.counters.fetched.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            skipped_ticks: self.counters.skipped_ticks.load(Ordering::Relaxed),
            dropped_payloads: self.counters.dropped_payloads.load(Ordering::Relaxed),
        }
    }

    /// Stop polling and wait for the thread to exit.
    pub fn shutdown(mut self) -> PollStats {
        self.stop();
        self.stats()
    }

    fn stop(&mut self) {
        // Disconnecting the channel interrupts the inter-tick wait and any
        // retry backoff. A request already in flight finishes first.
        self.shutdown_tx.take();
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("Poller thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we may be in Drop)
                    tracing::warn!(?e, "Poller thread panicked during shutdown");
                }
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
