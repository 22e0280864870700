//! Configuration types for the dashboard core.
//!
//! These are the runtime configuration structs used by `Dashboard` and
//! `Poller`. They are separate from the TOML-deserialized config in
//! `tracker_config`; see `conversions` for the mapping.

use std::time::Duration;

/// Shape of the realtime snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RealtimeSchema {
    /// Top-level `azimuth`/`elevation`, projected from each angle sample.
    #[default]
    Flat,
    /// Whatever the device nests (e.g. `panel.{Azimuth, Elevation}`), no projection.
    Nested,
}

/// State held by one dashboard session.
#[derive(Debug, Clone)]
pub struct SessionCfg {
    /// Samples retained per telemetry channel.
    pub history_capacity: usize,
    pub realtime_schema: RealtimeSchema,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            history_capacity: crate::history::DEFAULT_CAPACITY,
            realtime_schema: RealtimeSchema::Flat,
        }
    }
}

/// Telemetry polling cadence.
#[derive(Debug, Clone)]
pub struct PollCfg {
    /// Period between telemetry fetches.
    pub interval: Duration,
    /// Payloads buffered between the poller thread and the session loop.
    pub channel_depth: usize,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            channel_depth: 4,
        }
    }
}

/// Bounded retry with exponential backoff for a single device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one; 1 disables retry.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub backoff: Duration,
    /// Upper bound for one delay.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no sleeping.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay to wait before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let ms = crate::util::backoff_ms(
            crate::util::duration_ms(self.backoff),
            crate::util::duration_ms(self.max_backoff),
            retry,
        );
        Duration::from_millis(ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(1000),
        }
    }
}
