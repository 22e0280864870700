//! Test and helper mocks for tracker_core

use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracker_traits::{BoxError, DeviceApi};

/// A device that is never reachable; every call errors.
pub struct OfflineDevice;

impl DeviceApi for OfflineDevice {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        Err(Box::new(std::io::Error::other("device offline")))
    }
    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        Err(Box::new(std::io::Error::other("device offline")))
    }
    fn post_setting(&mut self, _body: &Value) -> Result<String, BoxError> {
        Err(Box::new(std::io::Error::other("device offline")))
    }
    fn post_brightness(&mut self, _body: &Value) -> Result<Value, BoxError> {
        Err(Box::new(std::io::Error::other("device offline")))
    }
}

#[derive(Debug, Default)]
struct Script {
    telemetry: VecDeque<Result<Value, String>>,
    setting: Option<Value>,
    posted: Vec<Value>,
    fail_posts: u32,
    telemetry_calls: u64,
}

/// Device with scripted responses. Clones share the script, so a test can
/// keep one handle while the poller thread owns another.
///
/// - telemetry: queued results, then `{}` once the queue is empty
/// - setting: last stored value (initially none -> error)
/// - posts: recorded; the first `fail_posts` calls fail
#[derive(Debug, Clone, Default)]
pub struct ScriptedDevice {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_telemetry(&self, payload: Value) -> &Self {
        self.with(|s| s.telemetry.push_back(Ok(payload)));
        self
    }

    pub fn push_telemetry_error(&self, msg: &str) -> &Self {
        self.with(|s| s.telemetry.push_back(Err(msg.to_string())));
        self
    }

    pub fn set_setting(&self, setting: Value) -> &Self {
        self.with(|s| s.setting = Some(setting));
        self
    }

    pub fn fail_next_posts(&self, n: u32) -> &Self {
        self.with(|s| s.fail_posts = n);
        self
    }

    pub fn posted(&self) -> Vec<Value> {
        self.with(|s| s.posted.clone())
    }

    pub fn telemetry_calls(&self) -> u64 {
        self.with(|s| s.telemetry_calls)
    }

    fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl DeviceApi for ScriptedDevice {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        self.with(|s| {
            s.telemetry_calls += 1;
            match s.telemetry.pop_front() {
                Some(Ok(v)) => Ok(v),
                Some(Err(msg)) => Err(BoxError::from(msg)),
                None => Ok(json!({})),
            }
        })
    }

    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        self.with(|s| s.setting.clone().ok_or_else(|| BoxError::from("no setting scripted")))
    }

    fn post_setting(&mut self, body: &Value) -> Result<String, BoxError> {
        self.with(|s| {
            if s.fail_posts > 0 {
                s.fail_posts -= 1;
                return Err(BoxError::from("connection reset"));
            }
            s.posted.push(body.clone());
            s.setting = Some(body.clone());
            Ok("setting data received".to_string())
        })
    }

    fn post_brightness(&mut self, body: &Value) -> Result<Value, BoxError> {
        Ok(json!({ "message": "brightness data received", "controlData": body.get("data") }))
    }
}
