//! Maps `Box<dyn Error>` from the device boundary to typed `TrackerError`.
//!
//! `tracker_traits::DeviceApi` uses `Box<dyn Error + Send + Sync>` so any
//! transport can implement it; this module converts those errors to our
//! typed enum, with an optional feature-gated path for
//! `tracker_device::DeviceError` downcasting.

use crate::error::TrackerError;

/// Map a trait-boundary error to a typed `TrackerError`.
///
/// Attempts to downcast known device error types first, then falls back
/// to string-based heuristics.
pub fn map_device_error(e: &(dyn std::error::Error + 'static)) -> TrackerError {
    // Already typed (e.g. produced by a mock)
    if let Some(te) = e.downcast_ref::<TrackerError>() {
        return te.clone();
    }

    // Feature-gated: try to downcast to DeviceError for precise mapping
    #[cfg(feature = "device-errors")]
    {
        use tracker_device::error::DeviceError;
        if let Some(de) = e.downcast_ref::<DeviceError>() {
            return match de {
                DeviceError::Timeout => TrackerError::Timeout,
                DeviceError::Status { status, url, .. } => TrackerError::Status {
                    status: *status,
                    detail: url.clone(),
                },
                DeviceError::Decode(msg) => TrackerError::Payload(msg.clone()),
                other => TrackerError::Transport(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("timed out") || s.to_lowercase().contains("timeout") {
        TrackerError::Timeout
    } else {
        TrackerError::Transport(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_errors_fall_back_to_heuristics() {
        let e: Box<dyn std::error::Error + Send + Sync> = "operation timed out".into();
        assert_eq!(map_device_error(&*e), TrackerError::Timeout);
        let e: Box<dyn std::error::Error + Send + Sync> = "connection refused".into();
        assert_eq!(
            map_device_error(&*e),
            TrackerError::Transport("connection refused".into())
        );
    }

    #[test]
    fn typed_tracker_errors_pass_through() {
        let e: Box<dyn std::error::Error + Send + Sync> =
            Box::new(TrackerError::InvalidMode("turbo".into()));
        assert_eq!(
            map_device_error(&*e),
            TrackerError::InvalidMode("turbo".into())
        );
    }

    #[cfg(feature = "device-errors")]
    #[test]
    fn device_errors_map_precisely() {
        use tracker_device::error::DeviceError;
        let e: Box<dyn std::error::Error + Send + Sync> = Box::new(DeviceError::Status {
            status: 502,
            url: "http://dev/v1/temp/raw".into(),
        });
        assert_eq!(
            map_device_error(&*e),
            TrackerError::Status {
                status: 502,
                detail: "http://dev/v1/temp/raw".into()
            }
        );
    }
}
