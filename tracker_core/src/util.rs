//! Common time/backoff helpers for tracker_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Duration in whole milliseconds, saturating at `u64::MAX`.
#[inline]
pub fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Exponential backoff: `base_ms * 2^retry`, capped at `max_ms`.
/// - Saturates instead of overflowing for large `retry`.
/// - A zero base always yields zero.
#[inline]
pub fn backoff_ms(base_ms: u64, max_ms: u64, retry: u32) -> u64 {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor).min(max_ms)
}

/// Poll rate in Hz for a given period, for log lines. At least 1 ms is assumed.
#[inline]
pub fn rate_hz(period: Duration) -> f64 {
    MILLIS_PER_SEC as f64 / duration_ms(period).max(1) as f64
}
