//! In-process simulated tracker.
//!
//! Speaks the same contract as the firmware: numbers on the wire are
//! `"%.2f"` strings, settings are stored verbatim on POST and returned on GET,
//! and the legacy brightness endpoint echoes its input.

use crate::util::wire_num;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard};
use tracker_traits::{BoxError, DeviceApi};

#[derive(Debug)]
struct SimState {
    tick: u64,
    setting: Value,
    /// Degrees added to the yaw angle per telemetry fetch.
    yaw_step_deg: f64,
}

/// Simulated device. Clones share state, so a poller thread and the
/// session can each hold one.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    state: Arc<Mutex<SimState>>,
}

/// Setting the simulated device starts with, shaped like a firmware GET.
pub fn factory_setting() -> Value {
    json!({
        "pid": {
            "pos": {"p": "0.10", "i": "0.10", "d": "0.10", "maxout": "30.00", "maxitg": "10.00"},
            "vel": {"p": "0.10", "i": "0.10", "d": "0.10", "maxout": "30.00", "maxitg": "10.00"}
        },
        "mode": "auto",
        "yaw_offset": "0.00",
        "th": {"maxv": "12.10", "minv": "10.10"},
        "man": {"pitch": "20.00", "yaw": "30.00"}
    })
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::with_setting(factory_setting())
    }

    pub fn with_setting(setting: Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                tick: 0,
                setting,
                yaw_step_deg: 7.5,
            })),
        }
    }

    /// Change how fast the simulated panel turns.
    pub fn set_yaw_step(&self, deg: f64) {
        self.lock().yaw_step_deg = deg;
    }

    /// Number of telemetry fetches served so far.
    pub fn ticks(&self) -> u64 {
        self.lock().tick
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceApi for SimulatedDevice {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        let mut st = self.lock();
        st.tick += 1;
        let t = st.tick as f64;
        let yaw = (t * st.yaw_step_deg).rem_euclid(360.0);
        let pitch = 30.0 + 15.0 * (t / 10.0).sin();
        let payload = json!({
            "acc": {
                "x": wire_num((t / 3.0).sin()),
                "y": wire_num((t / 5.0).cos()),
                "z": wire_num(0.98 + 0.02 * (t / 7.0).sin()),
            },
            "angle": {
                "x": wire_num(yaw),
                "y": wire_num(pitch),
                "z": wire_num(0.0),
            },
            "panel": {
                "Azimuth": wire_num(yaw),
                "Elevation": wire_num(pitch),
                "voltage": wire_num(11.5 + 0.5 * (t / 20.0).sin()),
                "temperature": wire_num(28.5),
                "time": st.tick,
            }
        });
        tracing::trace!(tick = st.tick, "simulated telemetry");
        Ok(payload)
    }

    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        Ok(self.lock().setting.clone())
    }

    fn post_setting(&mut self, body: &Value) -> Result<String, BoxError> {
        if !body.is_object() {
            return Err(BoxError::from("Error parsing JSON!"));
        }
        self.lock().setting = body.clone();
        tracing::debug!(%body, "simulated device stored setting");
        Ok("setting data received".to_string())
    }

    fn post_brightness(&mut self, body: &Value) -> Result<Value, BoxError> {
        Ok(json!({
            "message": "brightness data received",
            "controlData": body.get("data").cloned().unwrap_or(Value::Null),
        }))
    }
}
