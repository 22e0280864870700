//! Device synchronization: typed, retrying wrapper over `DeviceApi`.

use crate::config::RetryPolicy;
use crate::control::ControlConfig;
use crate::device_error::map_device_error;
use crate::error::TrackerError;
use serde_json::{Value, json};
use std::time::Duration;
use tracker_traits::clock::{Clock, MonotonicClock};
use tracker_traits::{BoxError, DeviceApi};

/// Run `op` up to `policy.max_attempts` times, sleeping on `clock` between
/// attempts. Non-retryable errors (4xx, malformed payloads) return at once.
pub fn with_retry<T, C: Clock>(
    clock: &C,
    policy: &RetryPolicy,
    what: &'static str,
    op: impl FnMut() -> Result<T, BoxError>,
) -> Result<T, TrackerError> {
    with_retry_while(
        policy,
        what,
        |delay| {
            clock.sleep(delay);
            true
        },
        op,
    )
}

/// Like [`with_retry`], but the pause between attempts is left to `pause`.
/// When `pause` returns `false` the remaining attempts are abandoned and the
/// last error is returned.
pub fn with_retry_while<T>(
    policy: &RetryPolicy,
    what: &'static str,
    mut pause: impl FnMut(Duration) -> bool,
    mut op: impl FnMut() -> Result<T, BoxError>,
) -> Result<T, TrackerError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(v) => {
                if attempt > 1 {
                    tracing::debug!(what, attempt, "request succeeded after retry");
                }
                return Ok(v);
            }
            Err(e) => {
                let err = map_device_error(&*e);
                if attempt >= attempts || !err.is_retryable() {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt - 1);
                tracing::debug!(
                    what,
                    attempt,
                    error = %err,
                    delay_ms = crate::util::duration_ms(delay),
                    "request failed; retrying"
                );
                if !pause(delay) {
                    tracing::debug!(what, attempt, "retry abandoned");
                    return Err(err);
                }
            }
        }
    }
}

/// The dashboard's view of the device: every call is retried per the policy
/// and returns a typed error.
pub struct DeviceSyncClient<D, C = MonotonicClock> {
    device: D,
    clock: C,
    policy: RetryPolicy,
}

impl<D: DeviceApi> DeviceSyncClient<D, MonotonicClock> {
    pub fn new(device: D, policy: RetryPolicy) -> Self {
        Self::with_clock(device, policy, MonotonicClock::new())
    }
}

impl<D: DeviceApi, C: Clock> DeviceSyncClient<D, C> {
    pub fn with_clock(device: D, policy: RetryPolicy, clock: C) -> Self {
        Self {
            device,
            clock,
            policy,
        }
    }

    /// `GET /v1/temp/raw`, raw payload.
    pub fn fetch_telemetry(&mut self) -> Result<Value, TrackerError> {
        let device = &mut self.device;
        with_retry(&self.clock, &self.policy, "fetch_telemetry", || {
            device.fetch_telemetry()
        })
    }

    /// [`fetch_telemetry`](Self::fetch_telemetry) with the backoff left to
    /// `pause`; returning `false` from it stops retrying.
    pub fn fetch_telemetry_while(
        &mut self,
        pause: impl FnMut(Duration) -> bool,
    ) -> Result<Value, TrackerError> {
        let device = &mut self.device;
        with_retry_while(&self.policy, "fetch_telemetry", pause, || {
            device.fetch_telemetry()
        })
    }

    /// `GET /v1/setting`, raw payload. Use `ControlConfigStore::replace_from_wire`
    /// to validate and store it.
    pub fn fetch_setting(&mut self) -> Result<Value, TrackerError> {
        let device = &mut self.device;
        with_retry(&self.clock, &self.policy, "fetch_setting", || {
            device.fetch_setting()
        })
    }

    /// `POST /v1/setting` with the full configuration. Returns the device's
    /// acknowledgement message.
    pub fn push_setting(&mut self, config: &ControlConfig) -> Result<String, TrackerError> {
        let body = config.to_wire()?;
        let device = &mut self.device;
        with_retry(&self.clock, &self.policy, "push_setting", || {
            device.post_setting(&body)
        })
    }

    /// Legacy `POST /v1/light/brightness`. Not retried: the endpoint is not
    /// known to be idempotent.
    pub fn brightness(&mut self, data: Value) -> Result<Value, TrackerError> {
        let body = json!({ "data": data });
        self.device
            .post_brightness(&body)
            .map_err(|e| map_device_error(&*e))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}
