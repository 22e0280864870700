//! Backend selection: one cloneable device type for the session and the poller.

use serde_json::Value;
use std::time::Duration;
use tracker_config::{Backend, Config};
use tracker_device::{HttpDevice, SimulatedDevice};
use tracker_traits::{BoxError, DeviceApi};

/// The configured device. Clones talk to the same device (HTTP clones share
/// the connection pool, simulator clones share state).
#[derive(Debug, Clone)]
pub enum AnyDevice {
    Http(HttpDevice),
    Sim(SimulatedDevice),
}

impl AnyDevice {
    pub fn from_config(cfg: &Config) -> Self {
        match cfg.device.backend {
            Backend::Http => {
                let timeout = Duration::from_millis(cfg.device.timeout_ms);
                tracing::info!(base_url = %cfg.device.base_url, timeout_ms = cfg.device.timeout_ms, "using HTTP backend");
                AnyDevice::Http(HttpDevice::new(&cfg.device.base_url, timeout))
            }
            Backend::Sim => {
                tracing::info!("using simulated backend");
                AnyDevice::Sim(SimulatedDevice::new())
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyDevice::Http(_) => "http",
            AnyDevice::Sim(_) => "sim",
        }
    }
}

impl DeviceApi for AnyDevice {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        match self {
            AnyDevice::Http(d) => d.fetch_telemetry(),
            AnyDevice::Sim(d) => d.fetch_telemetry(),
        }
    }

    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        match self {
            AnyDevice::Http(d) => d.fetch_setting(),
            AnyDevice::Sim(d) => d.fetch_setting(),
        }
    }

    fn post_setting(&mut self, body: &Value) -> Result<String, BoxError> {
        match self {
            AnyDevice::Http(d) => d.post_setting(body),
            AnyDevice::Sim(d) => d.post_setting(body),
        }
    }

    fn post_brightness(&mut self, body: &Value) -> Result<Value, BoxError> {
        match self {
            AnyDevice::Http(d) => d.post_brightness(body),
            AnyDevice::Sim(d) => d.post_brightness(body),
        }
    }
}
