//! Retry/backoff behaviour of `DeviceSyncClient`, driven by a manual clock so
//! no test actually sleeps.

use serde_json::{Value, json};
use std::time::Duration;
use tracker_core::mocks::{OfflineDevice, ScriptedDevice};
use tracker_core::{ControlConfig, DeviceSyncClient, RetryPolicy, TrackerError};
use tracker_traits::clock::ManualClock;
use tracker_traits::{BoxError, DeviceApi};

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(250),
    }
}

#[test]
fn transient_failures_are_retried_with_backoff() {
    let dev = ScriptedDevice::new();
    dev.push_telemetry_error("connection reset")
        .push_telemetry_error("connection reset")
        .push_telemetry(json!({"light": 1}));
    let clock = ManualClock::new();
    let mut client = DeviceSyncClient::with_clock(dev.clone(), policy(3), clock.clone());

    let payload = client.fetch_telemetry().unwrap();
    assert_eq!(payload, json!({"light": 1}));
    assert_eq!(dev.telemetry_calls(), 3);
    // 100 ms, then 200 ms
    assert_eq!(clock.elapsed(), Duration::from_millis(300));
}

#[test]
fn gives_up_after_max_attempts() {
    let clock = ManualClock::new();
    let mut client = DeviceSyncClient::with_clock(OfflineDevice, policy(4), clock.clone());

    let err = client.fetch_setting().unwrap_err();
    assert!(matches!(err, TrackerError::Transport(_)), "{err:?}");
    // 100 + 200 + 250 (capped)
    assert_eq!(clock.elapsed(), Duration::from_millis(550));
}

#[test]
fn single_attempt_policy_never_sleeps() {
    let clock = ManualClock::new();
    let mut client = DeviceSyncClient::with_clock(OfflineDevice, RetryPolicy::none(), clock.clone());
    assert!(client.fetch_telemetry().is_err());
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

/// Answers every request with a fixed typed error and counts calls.
struct FailingWith {
    err: TrackerError,
    calls: u32,
}

impl FailingWith {
    fn fail(&mut self) -> BoxError {
        self.calls += 1;
        Box::new(self.err.clone())
    }
}

impl DeviceApi for FailingWith {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        Err(self.fail())
    }
    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        Err(self.fail())
    }
    fn post_setting(&mut self, _body: &Value) -> Result<String, BoxError> {
        Err(self.fail())
    }
    fn post_brightness(&mut self, _body: &Value) -> Result<Value, BoxError> {
        Err(self.fail())
    }
}

#[test]
fn client_errors_are_not_retried() {
    let dev = FailingWith {
        err: TrackerError::Status {
            status: 404,
            detail: "/v1/setting".into(),
        },
        calls: 0,
    };
    let clock = ManualClock::new();
    let mut client = DeviceSyncClient::with_clock(dev, policy(5), clock.clone());

    let err = client.fetch_setting().unwrap_err();
    assert!(matches!(err, TrackerError::Status { status: 404, .. }));
    assert_eq!(client.device_mut().calls, 1);
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

#[test]
fn server_errors_are_retried() {
    let dev = FailingWith {
        err: TrackerError::Status {
            status: 503,
            detail: String::new(),
        },
        calls: 0,
    };
    let mut client = DeviceSyncClient::with_clock(dev, policy(3), ManualClock::new());
    assert!(client.fetch_telemetry().is_err());
    assert_eq!(client.into_inner().calls, 3);
}

#[test]
fn push_setting_retries_until_acknowledged() {
    let dev = ScriptedDevice::new();
    dev.fail_next_posts(2);
    let mut client = DeviceSyncClient::with_clock(dev.clone(), policy(3), ManualClock::new());

    let ack = client.push_setting(&ControlConfig::default()).unwrap();
    assert_eq!(ack, "setting data received");
    assert_eq!(dev.posted().len(), 1);
}

#[test]
fn brightness_is_sent_once_and_wrapped_in_data() {
    let dev = FailingWith {
        err: TrackerError::Transport("connection reset".into()),
        calls: 0,
    };
    let mut client = DeviceSyncClient::with_clock(dev, policy(3), ManualClock::new());
    assert!(client.brightness(json!(42)).is_err());
    assert_eq!(client.device_mut().calls, 1);

    let mut ok = DeviceSyncClient::with_clock(ScriptedDevice::new(), policy(3), ManualClock::new());
    let resp = ok.brightness(json!(42)).unwrap();
    assert_eq!(resp["controlData"], json!(42));
}

#[test]
fn declined_pause_abandons_remaining_attempts() {
    let dev = ScriptedDevice::new();
    dev.push_telemetry_error("connection reset")
        .push_telemetry_error("connection reset")
        .push_telemetry(json!({"light": 1}));
    let mut client = DeviceSyncClient::with_clock(dev.clone(), policy(3), ManualClock::new());

    let mut pauses = Vec::new();
    let err = client
        .fetch_telemetry_while(|d| {
            pauses.push(d);
            false
        })
        .unwrap_err();
    assert!(matches!(err, TrackerError::Transport(_)));
    assert_eq!(pauses, vec![Duration::from_millis(100)]);
    assert_eq!(dev.telemetry_calls(), 1);
}
