//! Three-axis telemetry reading.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One acceleration or angle reading. Plain value, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Read `{x, y, z}` from an already-coerced JSON object.
    ///
    /// Extra keys (the legacy `time` stamp) are ignored. Returns `None` when an
    /// axis is missing or not numeric.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let axis = |k: &str| obj.get(k).and_then(Value::as_f64);
        Some(Self {
            x: axis("x")?,
            y: axis("y")?,
            z: axis("z")?,
        })
    }
}

impl From<[f64; 3]> for Sample3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}
