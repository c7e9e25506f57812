//! Shifted timestamp arithmetic.
//!
//! A shifted timestamp keeps whole seconds above bit 20 and the sub-second
//! microseconds in the low 20 bits, so timestamps sort as plain integers.

/// Number of low bits reserved for microseconds.
pub const SECONDS_BITSHIFT: u32 = 20;

const MICROS_MASK: i64 = (1 << SECONDS_BITSHIFT) - 1;
const MICROS_PER_SEC: i64 = 1_000_000;

/// Converts microseconds since the epoch to a shifted timestamp.
#[must_use]
pub const fn shift(micros: i64) -> i64 {
    let seconds = micros.div_euclid(MICROS_PER_SEC);
    let sub = micros.rem_euclid(MICROS_PER_SEC);
    (seconds << SECONDS_BITSHIFT) | sub
}

/// Converts a shifted timestamp back to microseconds since the epoch.
#[must_use]
pub const fn unshift(ts: i64) -> i64 {
    (ts >> SECONDS_BITSHIFT) * MICROS_PER_SEC + (ts & MICROS_MASK)
}

/// Returns the whole seconds of a shifted timestamp.
///
/// Timestamps before the epoch saturate to 0; ones past `u32::MAX`
/// seconds saturate to `u32::MAX`.
#[must_use]
pub const fn to_seconds(ts: i64) -> u32 {
    let seconds = ts >> SECONDS_BITSHIFT;
    if seconds < 0 {
        0
    } else if seconds > u32::MAX as i64 {
        u32::MAX
    } else {
        seconds as u32
    }
}

/// Builds a shifted timestamp from whole seconds.
#[must_use]
pub const fn from_seconds(seconds: u32) -> i64 {
    (seconds as i64) << SECONDS_BITSHIFT
}
