//! HTTP transport for the tracker REST API (firmware or dev mock server).

use crate::error::{DeviceError, Result};
use crate::util::{join_url, parse_ack};
use serde_json::Value;
use std::time::Duration;
use tracker_traits::{BoxError, DeviceApi};

pub const TELEMETRY_PATH: &str = "/v1/temp/raw";
pub const SETTING_PATH: &str = "/v1/setting";
pub const BRIGHTNESS_PATH: &str = "/v1/light/brightness";

/// Blocking HTTP client bound to one device base URL.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct HttpDevice {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpDevice {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        tracing::trace!(%url, "GET");
        let resp = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| map_ureq_error(&url, e))?;
        let text = resp.into_string()?;
        serde_json::from_str(&text).map_err(|e| DeviceError::Decode(format!("{url}: {e}")))
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<String> {
        let url = self.url(path);
        tracing::trace!(%url, "POST");
        let resp = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| map_ureq_error(&url, e))?;
        Ok(resp.into_string()?)
    }
}

impl std::fmt::Debug for HttpDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDevice")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn map_ureq_error(url: &str, e: ureq::Error) -> DeviceError {
    match e {
        ureq::Error::Status(status, _) => DeviceError::Status {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(t) => {
            let msg = t.to_string();
            if msg.to_ascii_lowercase().contains("timed out") {
                DeviceError::Timeout
            } else {
                DeviceError::Transport(msg)
            }
        }
    }
}

impl DeviceApi for HttpDevice {
    fn fetch_telemetry(&mut self) -> std::result::Result<Value, BoxError> {
        Ok(self.get_json(TELEMETRY_PATH)?)
    }

    fn fetch_setting(&mut self) -> std::result::Result<Value, BoxError> {
        Ok(self.get_json(SETTING_PATH)?)
    }

    fn post_setting(&mut self, body: &Value) -> std::result::Result<String, BoxError> {
        let text = self.post_json(SETTING_PATH, body)?;
        Ok(parse_ack(&text))
    }

    fn post_brightness(&mut self, body: &Value) -> std::result::Result<Value, BoxError> {
        let text = self.post_json(BRIGHTNESS_PATH, body)?;
        let url = self.url(BRIGHTNESS_PATH);
        Ok(serde_json::from_str(&text).map_err(|e| DeviceError::Decode(format!("{url}: {e}")))?)
    }
}
