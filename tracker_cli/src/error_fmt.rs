//! Human-readable error descriptions and structured JSON error formatting.

use tracker_core::TrackerError;

/// Stable name for the error class, used as `reason` in JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<TrackerError>() {
        Some(TrackerError::Transport(_)) => "Transport",
        Some(TrackerError::Status { .. }) => "Status",
        Some(TrackerError::Timeout) => "Timeout",
        Some(TrackerError::Payload(_)) => "Payload",
        Some(TrackerError::InvalidMode(_)) => "InvalidMode",
        Some(TrackerError::Config(_)) => "Config",
        None => "Error",
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(te) = err.downcast_ref::<TrackerError>() {
        return match te {
            TrackerError::Transport(msg) => format!(
                "What happened: Could not reach the tracker ({msg}).\nLikely causes: Wrong device.base_url, the device is off, or this machine is not on the tracker's network.\nHow to fix: Check [device] base_url in the config and that the tracker answers on it, or use backend = \"sim\"."
            ),
            TrackerError::Timeout => "What happened: The tracker did not answer in time.\nLikely causes: Weak Wi-Fi link, busy firmware, or device.timeout_ms set too low.\nHow to fix: Move closer to the tracker or raise device.timeout_ms and retry.max_attempts.".to_string(),
            TrackerError::Status { status, detail } => format!(
                "What happened: The tracker answered HTTP {status} for {detail}.\nLikely causes: Firmware without this endpoint or a wrong API prefix in device.base_url.\nHow to fix: Check the base URL (e.g. http://192.168.4.1/api) and the firmware version."
            ),
            TrackerError::Payload(msg) => format!(
                "What happened: Malformed data ({msg}).\nLikely causes: A configuration file that is not a JSON object or has fields of the wrong type.\nHow to fix: Compare the input with `tracker setting get` output and fix the offending field."
            ),
            TrackerError::InvalidMode(mode) => format!(
                "What happened: Invalid mode {mode:?}.\nLikely causes: A typo or a mode the firmware does not know.\nHow to fix: Use \"auto\" or \"manual\"."
            ),
            TrackerError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/tracker.toml for a sample."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Exit code per error class: 3 device unreachable or failing, 4 invalid
/// mode, 5 invalid config, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<TrackerError>() {
        Some(TrackerError::Transport(_) | TrackerError::Timeout | TrackerError::Status { .. }) => 3,
        Some(TrackerError::InvalidMode(_)) => 4,
        Some(TrackerError::Config(_)) => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
