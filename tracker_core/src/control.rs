//! Control configuration record and its replace-only store.
//!
//! The device is the schema authority: a configuration update always
//! replaces the whole record. Fields missing from the update are gone
//! afterwards; there is no merge and no partial update.

use crate::coerce::coerce;
use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Operating mode label. `Auto` runs the closed PID loop, `Manual` holds
/// `man.pitch`/`man.yaw`. The client does not interpret it further.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            other => Err(TrackerError::InvalidMode(other.to_string())),
        }
    }
}

/// One PID controller's gains. `maxout`/`maxitg` are output and integral limits.
///
/// Firmware builds differ in which keys they report, so every gain is
/// optional and unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxitg: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PidGains {
    pub fn new(p: f64, i: f64, d: f64) -> Self {
        Self {
            p: Some(p),
            i: Some(i),
            d: Some(d),
            ..Self::default()
        }
    }

    fn has_negative_gain(&self) -> bool {
        [self.p, self.i, self.d].into_iter().flatten().any(|g| g < 0.0)
    }
}

/// Gain sets by loop. Firmware reports the pitch loops as well; any other
/// loop lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PidSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<PidGains>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel: Option<PidGains>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_pos: Option<PidGains>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_vel: Option<PidGains>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Panel voltage window in volts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoltageThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxv: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VoltageThresholds {
    pub fn new(minv: f64, maxv: f64) -> Self {
        Self {
            minv: Some(minv),
            maxv: Some(maxv),
            extra: Map::new(),
        }
    }
}

/// Manual-mode target angles in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualAngles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManualAngles {
    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self {
            pitch: Some(pitch),
            yaw: Some(yaw),
            extra: Map::new(),
        }
    }
}

/// Full control configuration as exchanged with `/v1/setting`.
///
/// Every field, top-level or nested, is optional so that a replacement
/// without, say, `th` really leaves the live configuration without `th`,
/// and a reply missing one gain is still accepted. Unknown keys at any
/// level are kept in `extra` and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<PidSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub th: Option<VoltageThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man: Option<ManualAngles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_offset: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pid: Some(PidSet {
                pos: Some(PidGains::new(0.1, 0.1, 0.1)),
                ..PidSet::default()
            }),
            mode: Some(Mode::Auto),
            th: Some(VoltageThresholds::new(10.1, 12.1)),
            man: Some(ManualAngles::new(20.0, 30.0)),
            yaw_offset: None,
            extra: Map::new(),
        }
    }
}

impl ControlConfig {
    /// Parse a configuration received from the device or the user.
    ///
    /// Numeric strings are coerced first. A `mode` other than `"auto"` or
    /// `"manual"` is rejected with [`TrackerError::InvalidMode`]; any other
    /// shape problem is [`TrackerError::Payload`].
    pub fn from_wire(raw: Value) -> Result<Self, TrackerError> {
        let value = coerce(raw);
        let Some(obj) = value.as_object() else {
            return Err(TrackerError::Payload(
                "control configuration must be a JSON object".to_string(),
            ));
        };
        match obj.get("mode") {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                s.parse::<Mode>()?;
            }
            Some(other) => return Err(TrackerError::InvalidMode(other.to_string())),
        }
        serde_json::from_value(value).map_err(|e| TrackerError::Payload(e.to_string()))
    }

    /// Wire representation for `POST /v1/setting`.
    pub fn to_wire(&self) -> Result<Value, TrackerError> {
        serde_json::to_value(self).map_err(|e| TrackerError::Payload(e.to_string()))
    }

    /// Soft plausibility problems. Reported for logging only; the store
    /// accepts the configuration regardless.
    pub fn threshold_warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(VoltageThresholds {
            minv: Some(minv),
            maxv: Some(maxv),
            ..
        }) = &self.th
            && minv > maxv
        {
            out.push(format!("th.minv ({minv}) is above th.maxv ({maxv})"));
        }
        if let Some(pid) = &self.pid {
            let sets = [
                ("pos", &pid.pos),
                ("vel", &pid.vel),
                ("pitch_pos", &pid.pitch_pos),
                ("pitch_vel", &pid.pitch_vel),
            ];
            for (name, gains) in sets {
                if gains.as_ref().is_some_and(PidGains::has_negative_gain) {
                    out.push(format!("pid.{name} has a negative gain"));
                }
            }
        }
        out
    }
}

/// Authoritative control configuration for one dashboard session.
#[derive(Debug, Clone, Default)]
pub struct ControlConfigStore {
    current: ControlConfig,
    revision: u64,
}

impl ControlConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `config` as a whole. No merge, no range validation.
    pub fn replace(&mut self, config: ControlConfig) {
        for w in config.threshold_warnings() {
            tracing::warn!(warning = %w, "control configuration looks implausible");
        }
        self.current = config;
        self.revision = self.revision.saturating_add(1);
    }

    /// Boundary entry point for untyped input. On error the store is untouched.
    pub fn replace_from_wire(&mut self, raw: Value) -> Result<(), TrackerError> {
        let config = ControlConfig::from_wire(raw)?;
        self.replace(config);
        Ok(())
    }

    /// Latest configuration, or the default if nothing was ever stored.
    pub fn current(&self) -> &ControlConfig {
        &self.current
    }

    /// Number of successful replacements; 0 means still on the default.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_matches_documented_values() {
        let c = ControlConfig::default();
        assert_eq!(c.mode, Some(Mode::Auto));
        let pos = c.pid.as_ref().and_then(|p| p.pos.clone()).unwrap();
        assert_eq!((pos.p, pos.i, pos.d), (Some(0.1), Some(0.1), Some(0.1)));
        assert_eq!(c.th, Some(VoltageThresholds::new(10.1, 12.1)));
        assert_eq!(c.man, Some(ManualAngles::new(20.0, 30.0)));
    }

    #[test]
    fn mode_parsing_is_exact() {
        assert_eq!("manual".parse::<Mode>(), Ok(Mode::Manual));
        assert!(matches!("Auto".parse::<Mode>(), Err(TrackerError::InvalidMode(_))));
    }

    #[test]
    fn non_string_mode_is_invalid() {
        let err = ControlConfig::from_wire(json!({"mode": 1})).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidMode(_)));
    }

    #[test]
    fn warnings_flag_inverted_thresholds() {
        let mut c = ControlConfig::default();
        c.th = Some(VoltageThresholds::new(13.0, 12.0));
        assert_eq!(c.threshold_warnings().len(), 1);
    }

    #[test]
    fn half_a_threshold_window_is_not_a_warning() {
        let mut c = ControlConfig::default();
        c.th = Some(VoltageThresholds {
            minv: Some(13.0),
            ..VoltageThresholds::default()
        });
        assert!(c.threshold_warnings().is_empty());
    }
}
