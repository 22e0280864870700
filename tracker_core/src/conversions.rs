//! `From` implementations bridging `tracker_config` types to `tracker_core` types.

use crate::config::{PollCfg, RealtimeSchema, RetryPolicy, SessionCfg};
use std::time::Duration;

// ── RealtimeSchema ───────────────────────────────────────────────────────────

impl From<tracker_config::RealtimeSchema> for RealtimeSchema {
    fn from(s: tracker_config::RealtimeSchema) -> Self {
        match s {
            tracker_config::RealtimeSchema::Flat => RealtimeSchema::Flat,
            tracker_config::RealtimeSchema::Nested => RealtimeSchema::Nested,
        }
    }
}

// ── SessionCfg ───────────────────────────────────────────────────────────────

impl From<&tracker_config::Config> for SessionCfg {
    fn from(c: &tracker_config::Config) -> Self {
        Self {
            history_capacity: c.history.capacity,
            realtime_schema: c.realtime.schema.into(),
        }
    }
}

// ── PollCfg ──────────────────────────────────────────────────────────────────

impl From<&tracker_config::PollCfg> for PollCfg {
    fn from(c: &tracker_config::PollCfg) -> Self {
        Self {
            interval: Duration::from_millis(c.interval_ms),
            channel_depth: c.channel_depth,
        }
    }
}

// ── RetryPolicy ──────────────────────────────────────────────────────────────

impl From<&tracker_config::RetryCfg> for RetryPolicy {
    fn from(c: &tracker_config::RetryCfg) -> Self {
        Self {
            max_attempts: c.max_attempts,
            backoff: Duration::from_millis(c.backoff_ms),
            max_backoff: Duration::from_millis(c.max_backoff_ms),
        }
    }
}
