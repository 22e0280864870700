//! Telemetry ingest: histories for charting plus the merged realtime snapshot.
//!
//! A raw `GET /v1/temp/raw` payload goes through three steps:
//! 1. [`coerce`] turns numeric strings into numbers.
//! 2. [`TelemetryFrame::from_payload`] pulls out the `acc`/`angle` samples
//!    (accepting the legacy `acceleration` key) and leaves the rest.
//! 3. [`TelemetryAggregator::apply`] pushes the samples and shallow-merges the
//!    rest into the realtime snapshot.
//!
//! Ingest is best-effort: firmware revisions drop and rename fields, so
//! anything malformed is skipped with a debug log instead of failing.

use crate::coerce::coerce;
use crate::config::RealtimeSchema;
use crate::history::{DEFAULT_CAPACITY, SampleRingBuffer};
use crate::sample::Sample3;
use serde_json::{Map, Value};

/// Latest device-reported values other than the sample channels.
/// The key set is whatever the device sends.
pub type RealtimeSnapshot = Map<String, Value>;

pub const ACC_KEY: &str = "acc";
/// Older firmware/mock name for `acc`; carries an extra `time` field.
pub const LEGACY_ACC_KEY: &str = "acceleration";
pub const ANGLE_KEY: &str = "angle";
pub const AZIMUTH_KEY: &str = "azimuth";
pub const ELEVATION_KEY: &str = "elevation";

/// A payload split into its typed samples and the free-form remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryFrame {
    pub acc: Option<Sample3>,
    pub angle: Option<Sample3>,
    /// Top-level keys other than `acc`/`acceleration`/`angle`, coerced.
    pub rest: RealtimeSnapshot,
}

impl TelemetryFrame {
    /// Coerce `payload` and split it. Never fails; a non-object payload
    /// yields an empty frame.
    pub fn from_payload(payload: Value) -> Self {
        let mut map = match coerce(payload) {
            Value::Object(map) => map,
            other => {
                tracing::debug!(kind = json_kind(&other), "telemetry payload is not an object; ignoring");
                return Self::default();
            }
        };

        let acc_raw = map.remove(ACC_KEY);
        let legacy_raw = map.remove(LEGACY_ACC_KEY);
        let acc = match (acc_raw, legacy_raw) {
            (Some(v), _) => sample_or_skip(ACC_KEY, &v),
            (None, Some(v)) => sample_or_skip(LEGACY_ACC_KEY, &v),
            (None, None) => None,
        };
        let angle = map
            .remove(ANGLE_KEY)
            .and_then(|v| sample_or_skip(ANGLE_KEY, &v));

        Self {
            acc,
            angle,
            rest: map,
        }
    }
}

fn sample_or_skip(key: &'static str, v: &Value) -> Option<Sample3> {
    let s = Sample3::from_value(v);
    if s.is_none() {
        tracing::debug!(key, value = %v, "skipping malformed sample");
    }
    s
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What one `ingest` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub acc: bool,
    pub angle: bool,
    pub merged_keys: Vec<String>,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        !self.acc && !self.angle && self.merged_keys.is_empty()
    }
}

/// Owns the acceleration and angle histories and the realtime snapshot.
#[derive(Debug, Clone)]
pub struct TelemetryAggregator {
    acceleration: SampleRingBuffer<Sample3>,
    angle: SampleRingBuffer<Sample3>,
    realtime: RealtimeSnapshot,
    schema: RealtimeSchema,
}

impl TelemetryAggregator {
    pub fn new(capacity: usize, schema: RealtimeSchema) -> Self {
        Self {
            acceleration: SampleRingBuffer::with_capacity(capacity),
            angle: SampleRingBuffer::with_capacity(capacity),
            realtime: RealtimeSnapshot::new(),
            schema,
        }
    }

    /// Fold one raw device payload into the state.
    pub fn ingest(&mut self, payload: Value) -> IngestReport {
        self.apply(TelemetryFrame::from_payload(payload))
    }

    /// Apply an already split frame. All mutations happen before returning.
    pub fn apply(&mut self, frame: TelemetryFrame) -> IngestReport {
        let mut report = IngestReport::default();

        if let Some(acc) = frame.acc {
            self.acceleration.push(acc);
            report.acc = true;
        }

        if let Some(angle) = frame.angle {
            self.angle.push(angle);
            report.angle = true;
            if self.schema == RealtimeSchema::Flat {
                self.realtime.insert(AZIMUTH_KEY.to_string(), Value::from(angle.x));
                self.realtime.insert(ELEVATION_KEY.to_string(), Value::from(angle.y));
            }
        }

        // Shallow merge: present keys replace wholesale, absent keys stay.
        for (key, value) in frame.rest {
            report.merged_keys.push(key.clone());
            self.realtime.insert(key, value);
        }

        report
    }

    pub fn acceleration_history(&self) -> &SampleRingBuffer<Sample3> {
        &self.acceleration
    }

    pub fn angle_history(&self) -> &SampleRingBuffer<Sample3> {
        &self.angle
    }

    pub fn current_realtime(&self) -> &RealtimeSnapshot {
        &self.realtime
    }

    /// Numeric realtime value at a top-level key, if present.
    pub fn realtime_f64(&self, key: &str) -> Option<f64> {
        self.realtime.get(key).and_then(Value::as_f64)
    }

    pub fn schema(&self) -> RealtimeSchema {
        self.schema
    }
}

impl Default for TelemetryAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, RealtimeSchema::Flat)
    }
}
