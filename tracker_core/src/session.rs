//! Dashboard session: the context object the poll loop and the UI share.
//!
//! Owns the telemetry aggregator and the control-config store for the
//! lifetime of one application session. All mutation goes through `&mut self`
//! so each ingest or replace completes before the next event is handled.

use crate::config::SessionCfg;
use crate::control::{ControlConfig, ControlConfigStore};
use crate::error::TrackerError;
use crate::poller::Poller;
use crate::sample::Sample3;
use crate::sync::DeviceSyncClient;
use crate::telemetry::{IngestReport, RealtimeSnapshot, TelemetryAggregator};
use serde::Serialize;
use serde_json::Value;
use tracker_traits::DeviceApi;
use tracker_traits::clock::Clock;

#[derive(Debug, Clone)]
pub struct Dashboard {
    telemetry: TelemetryAggregator,
    control: ControlConfigStore,
}

/// Serializable copy of the session state for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub acceleration: Vec<Sample3>,
    pub angle: Vec<Sample3>,
    pub realtime: RealtimeSnapshot,
    pub control: ControlConfig,
    pub control_revision: u64,
}

impl Dashboard {
    pub fn new(cfg: &SessionCfg) -> Self {
        Self {
            telemetry: TelemetryAggregator::new(cfg.history_capacity, cfg.realtime_schema),
            control: ControlConfigStore::new(),
        }
    }

    pub fn telemetry(&self) -> &TelemetryAggregator {
        &self.telemetry
    }

    pub fn control(&self) -> &ControlConfigStore {
        &self.control
    }

    /// Fold one raw telemetry payload into the state.
    pub fn ingest(&mut self, payload: Value) -> IngestReport {
        let report = self.telemetry.ingest(payload);
        if report.is_empty() {
            tracing::debug!("telemetry payload carried nothing usable");
        } else {
            tracing::trace!(
                acc = report.acc,
                angle = report.angle,
                merged = report.merged_keys.len(),
                "telemetry ingested"
            );
        }
        report
    }

    /// Ingest everything the poller has delivered so far. Returns the count.
    pub fn drain_poller(&mut self, poller: &Poller) -> usize {
        let pending = poller.drain();
        let n = pending.len();
        for payload in pending {
            self.ingest(payload);
        }
        n
    }

    /// Fetch the device configuration and make it the current one.
    /// On any error the stored configuration is left as it was.
    pub fn sync_config<D: DeviceApi, C: Clock>(
        &mut self,
        client: &mut DeviceSyncClient<D, C>,
    ) -> Result<&ControlConfig, TrackerError> {
        let raw = client.fetch_setting()?;
        self.control.replace_from_wire(raw)?;
        tracing::info!(
            revision = self.control.revision(),
            mode = self.control.current().mode.map(|m| m.as_str()),
            "control configuration synced from device"
        );
        Ok(self.control.current())
    }

    /// Send a full configuration to the device and, once acknowledged,
    /// replace the local one with it. A failed post changes nothing.
    pub fn push_config<D: DeviceApi, C: Clock>(
        &mut self,
        client: &mut DeviceSyncClient<D, C>,
        config: ControlConfig,
    ) -> Result<String, TrackerError> {
        let ack = client.push_setting(&config)?;
        self.control.replace(config);
        tracing::info!(revision = self.control.revision(), ack = %ack, "control configuration pushed");
        Ok(ack)
    }

    /// Like [`push_config`](Self::push_config) for untyped input; invalid
    /// input (e.g. an unknown mode) is rejected before anything is sent.
    pub fn push_config_from_wire<D: DeviceApi, C: Clock>(
        &mut self,
        client: &mut DeviceSyncClient<D, C>,
        raw: Value,
    ) -> Result<String, TrackerError> {
        let config = ControlConfig::from_wire(raw)?;
        self.push_config(client, config)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            acceleration: self.telemetry.acceleration_history().to_vec(),
            angle: self.telemetry.angle_history().to_vec(),
            realtime: self.telemetry.current_realtime().clone(),
            control: self.control.current().clone(),
            control_revision: self.control.revision(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&SessionCfg::default())
    }
}
