//! Watch loop: poll telemetry in the background and fold it into the session.

use crate::device::AnyDevice;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracker_core::{Dashboard, DashboardSnapshot, DeviceSyncClient, PollCfg, PollStats, Poller, RetryPolicy, SessionCfg};
use tracker_traits::clock::MonotonicClock;

/// Upper bound on one wait for a payload, so Ctrl-C is noticed promptly.
const RECV_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default)]
pub struct StopAfter {
    pub ticks: Option<u64>,
    pub duration: Option<Duration>,
}

#[derive(Debug)]
pub struct WatchOutcome {
    pub ingested: u64,
    pub stats: PollStats,
    pub snapshot: DashboardSnapshot,
}

pub fn run_watch(
    cfg: &tracker_config::Config,
    device: AnyDevice,
    stop: StopAfter,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<WatchOutcome> {
    let policy: RetryPolicy = (&cfg.retry).into();
    let poll: PollCfg = (&cfg.poll).into();
    let mut dash = Dashboard::new(&SessionCfg::from(cfg));

    // Config sync failure is not fatal for watching; the default stays in place
    let mut client = DeviceSyncClient::new(device.clone(), policy);
    if let Err(e) = dash.sync_config(&mut client) {
        tracing::warn!(error = %e, "could not sync control configuration; showing defaults");
    }

    let poller = Poller::spawn(device, poll, policy, MonotonicClock::new());
    let started = Instant::now();
    let deadline = stop.duration.map(|d| started + d);
    let mut ingested: u64 = 0;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("interrupted; stopping watch");
            break;
        }
        if stop.ticks.is_some_and(|n| ingested >= n) {
            break;
        }
        let slice = match deadline {
            Some(d) => {
                let left = d.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                left.min(RECV_SLICE)
            }
            None => RECV_SLICE,
        };
        if let Some(payload) = poller.recv_timeout(slice) {
            let report = dash.ingest(payload);
            ingested += 1;
            tracing::debug!(n = ingested, acc = report.acc, angle = report.angle, "payload ingested");
        }
    }

    let stats = poller.shutdown();
    tracing::info!(
        ingested,
        fetched = stats.fetched,
        failed = stats.failed,
        skipped_ticks = stats.skipped_ticks,
        dropped = stats.dropped_payloads,
        elapsed_ms = tracker_core::util::duration_ms(started.elapsed()),
        "watch finished"
    );
    Ok(WatchOutcome {
        ingested,
        stats,
        snapshot: dash.snapshot(),
    })
}

/// One JSON line with the outcome.
pub fn outcome_json(o: &WatchOutcome) -> eyre::Result<String> {
    let v = json!({
        "ingested": o.ingested,
        "stats": {
            "fetched": o.stats.fetched,
            "failed": o.stats.failed,
            "skipped_ticks": o.stats.skipped_ticks,
            "dropped_payloads": o.stats.dropped_payloads,
        },
        "snapshot": serde_json::to_value(&o.snapshot)?,
    });
    Ok(v.to_string())
}

/// Text rendering of the outcome for the terminal.
pub fn print_outcome(o: &WatchOutcome) {
    println!("Ingested {} payload(s)", o.ingested);
    println!(
        "Poller: fetched={} failed={} skipped_ticks={} dropped={}",
        o.stats.fetched, o.stats.failed, o.stats.skipped_ticks, o.stats.dropped_payloads
    );
    println!("Realtime:");
    for (k, v) in &o.snapshot.realtime {
        println!("  {k} = {v}");
    }
    print_series("Acceleration", &o.snapshot.acceleration);
    print_series("Angle", &o.snapshot.angle);
    match o.snapshot.control.mode {
        Some(mode) => println!("Mode: {mode} (config revision {})", o.snapshot.control_revision),
        None => println!("Mode: unset (config revision {})", o.snapshot.control_revision),
    }
}

fn print_series(name: &str, samples: &[tracker_core::Sample3]) {
    println!("{name} ({} samples):", samples.len());
    for s in samples {
        println!("  x={:>8.2} y={:>8.2} z={:>8.2}", s.x, s.y, s.z);
    }
}
