#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the tracker dashboard client.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; a missing file or an empty document yields a
//!   config that talks to the in-process simulated device.
use serde::Deserialize;
use std::path::Path;

/// Which device implementation the client talks to.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Real HTTP device (firmware or dev mock server)
    Http,
    /// In-process simulated device
    #[default]
    Sim,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceCfg {
    pub backend: Backend,
    /// Base URL the `/v1/...` paths are appended to, e.g. "http://192.168.4.1/api"
    pub base_url: String,
    /// Per-request timeout (connect + read)
    pub timeout_ms: u64,
}

impl Default for DeviceCfg {
    fn default() -> Self {
        Self {
            backend: Backend::Sim,
            base_url: "http://192.168.4.1/api".to_string(),
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollCfg {
    /// Telemetry fetch period. Also accepts alias "period_ms".
    #[serde(alias = "period_ms")]
    pub interval_ms: u64,
    /// Payloads buffered between the poller thread and the session loop
    pub channel_depth: usize,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            channel_depth: 4,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryCfg {
    /// Samples retained per telemetry channel
    pub capacity: usize,
}

impl Default for HistoryCfg {
    fn default() -> Self {
        Self { capacity: 20 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryCfg {
    /// Attempts per request including the first one (1 disables retry)
    pub max_attempts: u32,
    /// Delay before the first retry; doubled on each further retry
    pub backoff_ms: u64,
    /// Upper bound for a single backoff delay
    pub max_backoff_ms: u64,
}

impl Default for RetryCfg {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 100,
            max_backoff_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RealtimeSchema {
    /// `azimuth`/`elevation` at the top level, projected from `angle`
    #[default]
    Flat,
    /// device-provided `panel.{...}` object, no projection
    Nested,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RealtimeCfg {
    pub schema: RealtimeSchema,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceCfg,
    pub poll: PollCfg,
    pub history: HistoryCfg,
    pub retry: RetryCfg,
    pub realtime: RealtimeCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file. A missing file yields defaults.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Device
        if self.device.backend == Backend::Http {
            let url = self.device.base_url.trim();
            if url.is_empty() {
                eyre::bail!("device.base_url must be set for the http backend");
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                eyre::bail!("device.base_url must start with http:// or https://");
            }
        }
        if self.device.timeout_ms == 0 {
            eyre::bail!("device.timeout_ms must be >= 1");
        }
        if self.device.timeout_ms > 60_000 {
            eyre::bail!("device.timeout_ms is unreasonably large (>60s)");
        }

        // Poll
        if self.poll.interval_ms == 0 {
            eyre::bail!("poll.interval_ms must be >= 1");
        }
        if self.poll.interval_ms > 60 * 60 * 1000 {
            eyre::bail!("poll.interval_ms is unreasonably large (>1h)");
        }
        if self.poll.channel_depth == 0 {
            eyre::bail!("poll.channel_depth must be >= 1");
        }

        // History
        if self.history.capacity == 0 {
            eyre::bail!("history.capacity must be >= 1");
        }
        if self.history.capacity > 100_000 {
            eyre::bail!("history.capacity is unreasonably large (>100000)");
        }

        // Retry
        if self.retry.max_attempts == 0 {
            eyre::bail!("retry.max_attempts must be >= 1");
        }
        if self.retry.max_attempts > 10 {
            eyre::bail!("retry.max_attempts must be <= 10");
        }
        if self.retry.max_backoff_ms < self.retry.backoff_ms {
            eyre::bail!("retry.max_backoff_ms must be >= retry.backoff_ms");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
        }

        // Realtime: serde restricts to known schemas

        Ok(())
    }
}
