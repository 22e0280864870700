#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Client-side state core of the tracker dashboard (transport-agnostic).
//!
//! All device interaction goes through the `tracker_traits::DeviceApi` trait.
//!
//! ## Architecture
//!
//! - **Coercion**: numeric strings -> numbers for both wire generations (`coerce`)
//! - **History**: bounded FIFO per telemetry channel (`history`)
//! - **Telemetry**: payload split + shallow realtime merge (`telemetry`)
//! - **Control**: replace-only configuration store with mode validation (`control`)
//! - **Sync**: retrying device client (`sync`) and background poller (`poller`)
//! - **Session**: the `Dashboard` context object tying it together (`session`)

pub mod coerce;
pub mod config;
pub mod control;
pub mod conversions;
pub mod device_error;
pub mod error;
pub mod history;
pub mod mocks;
pub mod poller;
pub mod sample;
pub mod session;
pub mod sync;
pub mod telemetry;
pub mod util;

pub use coerce::coerce;
pub use config::{PollCfg, RealtimeSchema, RetryPolicy, SessionCfg};
pub use control::{
    ControlConfig, ControlConfigStore, ManualAngles, Mode, PidGains, PidSet, VoltageThresholds,
};
pub use error::TrackerError;
pub use history::{DEFAULT_CAPACITY, SampleRingBuffer};
pub use poller::{PollStats, Poller};
pub use sample::Sample3;
pub use session::{Dashboard, DashboardSnapshot};
pub use sync::DeviceSyncClient;
pub use telemetry::{IngestReport, RealtimeSnapshot, TelemetryAggregator, TelemetryFrame};
