//! Clock-time conversion between "HH:MM" strings and minute offsets.

use crate::error::{CoreError, Result};

/// Minutes in one day. Offsets at or beyond this are never produced.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Convert an "HH:MM" string to minutes since midnight.
///
/// Fails with [`CoreError::InvalidTimeFormat`] unless the string splits on
/// `:` into exactly two non-negative integers whose minute total fits in a
/// `u32`.
pub fn to_minutes(time: &str) -> Result<u32> {
    let mut parts = time.trim().split(':');
    let (hours, minutes) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), None) => (h, m),
        _ => return Err(CoreError::invalid_time(time)),
    };

    let hours: u32 = hours
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_time(time))?;
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_time(time))?;

    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(|| CoreError::invalid_time(time))
}

/// Format minutes since midnight as zero-padded "HH:MM".
///
/// Values past the end of the day are not wrapped.
pub fn to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
