//! `setting get|set` and `brightness`: one-shot request/response commands.

use crate::device::AnyDevice;
use serde_json::Value;
use std::path::Path;
use tracker_core::{ControlConfig, Dashboard, DeviceSyncClient, Mode, TrackerError};

pub fn get(dash: &mut Dashboard, client: &mut DeviceSyncClient<AnyDevice>) -> eyre::Result<ControlConfig> {
    Ok(dash.sync_config(client)?.clone())
}

/// Post a full configuration read from a JSON file.
pub fn set_from_file(
    dash: &mut Dashboard,
    client: &mut DeviceSyncClient<AnyDevice>,
    path: &Path,
) -> eyre::Result<String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read setting file {:?}: {}", path, e))?;
    let raw: Value = serde_json::from_str(&text)
        .map_err(|e| TrackerError::Payload(format!("{}: {e}", path.display())))?;
    Ok(dash.push_config_from_wire(client, raw)?)
}

/// Change only the mode: the mode is checked first, then the current device
/// configuration is fetched and posted back in full with the new mode.
pub fn set_mode(
    dash: &mut Dashboard,
    client: &mut DeviceSyncClient<AnyDevice>,
    mode: &str,
) -> eyre::Result<String> {
    let mode: Mode = mode.parse()?;
    let mut config = dash.sync_config(client)?.clone();
    config.mode = Some(mode);
    Ok(dash.push_config(client, config)?)
}

/// Legacy brightness echo. `data` is parsed as JSON; anything else is sent as text.
pub fn brightness(client: &mut DeviceSyncClient<AnyDevice>, data: &str) -> eyre::Result<Value> {
    let value = serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_string()));
    Ok(client.brightness(value)?)
}
