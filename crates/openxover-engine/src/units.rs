//! Unit conversions shared across the engine.

use std::f64::consts::PI;

/// Convert a frequency in Hz to angular frequency (rad/s).
pub fn hz_to_rad_per_second(hz: f64) -> f64 {
    hz * 2.0 * PI
}

/// Convert a linear voltage ratio to decibels.
pub fn ratio_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// Convert decibels to a linear voltage ratio.
pub fn db_to_ratio(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Convert radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}
