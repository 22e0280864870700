pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use serde_json::Value;

/// Error type crossing the device boundary. Implementations box their own
/// typed errors; `tracker_core` downcasts them back where it can.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The tracker's HTTP API as seen by the dashboard.
///
/// Payloads are returned as loosely-typed JSON; numeric fields may arrive as
/// numbers or numeric strings depending on firmware generation.
pub trait DeviceApi {
    /// `GET /v1/temp/raw`
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError>;

    /// `GET /v1/setting`
    fn fetch_setting(&mut self) -> Result<Value, BoxError>;

    /// `POST /v1/setting` with the full configuration object.
    /// Returns the acknowledgement message.
    fn post_setting(&mut self, body: &Value) -> Result<String, BoxError>;

    /// `POST /v1/light/brightness` (legacy) with a `{data: ...}` body.
    /// Returns the echoed response body.
    fn post_brightness(&mut self, body: &Value) -> Result<Value, BoxError>;
}

impl<D: DeviceApi + ?Sized> DeviceApi for Box<D> {
    fn fetch_telemetry(&mut self) -> Result<Value, BoxError> {
        (**self).fetch_telemetry()
    }
    fn fetch_setting(&mut self) -> Result<Value, BoxError> {
        (**self).fetch_setting()
    }
    fn post_setting(&mut self, body: &Value) -> Result<String, BoxError> {
        (**self).post_setting(body)
    }
    fn post_brightness(&mut self, body: &Value) -> Result<Value, BoxError> {
        (**self).post_brightness(body)
    }
}
