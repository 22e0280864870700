//! Device backends implementing `tracker_traits::DeviceApi`.
//!
//! - `HttpDevice`: the tracker's REST API over HTTP
//! - `SimulatedDevice`: an in-process stand-in with the same wire format
pub mod error;
pub mod http;
pub mod sim;
pub mod util;

pub use error::DeviceError;
pub use http::HttpDevice;
pub use sim::SimulatedDevice;
