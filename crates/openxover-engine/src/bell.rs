//! Bell (peaking/dipping), notch and band-pass resonator formulas.
//!
//! All four are series-inserted LC resonators tuned to f0. Notch and
//! band-pass are pure reactive pairs; the bells add a derived resistance so
//! the divider against the load lands on the requested gain:
//!
//!   r = R·10^(db/20) − R
//!
//! A bell-down shunts the resonator with r (maximum insertion loss r at
//! resonance); a bell-up puts r in parallel with the series pair (insertion
//! loss r everywhere except around resonance, where the pair shorts it out).
//! Since the network is passive, "gain" is always relative to the stage's own
//! stop region, never above unity.

use std::f64::consts::PI;

use crate::units::db_to_ratio;

/// Resistance realizing a `db` gain step against the downstream resistance.
/// Zero exactly when db = 0, which collapses the owning stage to a wire.
pub fn gain_resistance(r_downstream: f64, db: f64) -> f64 {
    r_downstream * db_to_ratio(db) - r_downstream
}

/// Notch resonator (L ∥ C inserted in series): (l1, c1).
pub fn notch_values(f0: f64, q: f64) -> (f64, f64) {
    let inv_q = 1.0 / q;
    (10.0 * inv_q / PI / f0, 0.025 / inv_q / PI / f0)
}

/// Band-pass resonator (L + C inserted in series): (l1, c1).
pub fn bandpass_values(f0: f64, q: f64) -> (f64, f64) {
    (2.5 * q / PI / f0, 0.1 / q / PI / f0)
}

/// Bell-down resonator values around the derived resistance: (l1, c1).
pub fn bell_down_values(f0: f64, q: f64, l1r: f64, r: f64) -> (f64, f64) {
    let inv_q = 1.0 / q;
    (
        0.5 * inv_q * (r + l1r) / PI / f0,
        0.5 / inv_q / (r + l1r) / PI / f0,
    )
}

/// Bell-up resonator values around the derived resistance: (l1, c1).
pub fn bell_up_values(f0: f64, q: f64, l1r: f64, r: f64) -> (f64, f64) {
    (0.5 * q * (r + l1r) / PI / f0, 0.5 / q / (r + l1r) / PI / f0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gain_resistance_zero_at_zero_db() {
        assert_eq!(gain_resistance(8.0, 0.0), 0.0);
    }

    #[test]
    fn test_gain_resistance_3db_into_8_ohms() {
        // 8·10^(3/20) − 8 ≈ 3.30 Ω
        assert_relative_eq!(gain_resistance(8.0, 3.0), 3.3003, max_relative = 1e-4);
    }

    #[test]
    fn test_gain_resistance_negative_below_zero_db() {
        assert!(gain_resistance(8.0, -3.0) < 0.0);
    }

    #[test]
    fn test_resonators_tune_to_f0() {
        // f_res = 1 / (2π·√(LC)) must land on f0 for both resonator shapes
        for (l, c) in [
            notch_values(1000.0, 1.0),
            bandpass_values(1000.0, 1.0),
            bell_down_values(1000.0, 1.0, 0.0, 3.3),
            bell_up_values(1000.0, 1.0, 0.0, 3.3),
        ] {
            let f_res = 1.0 / (2.0 * PI * (l * c).sqrt());
            assert_relative_eq!(f_res, 1000.0, max_relative = 1e-2);
        }
    }

    #[test]
    fn test_q_narrows_the_resonator() {
        let (l_wide, c_wide) = bandpass_values(1000.0, 0.5);
        let (l_narrow, c_narrow) = bandpass_values(1000.0, 4.0);
        assert!(l_narrow > l_wide);
        assert!(c_narrow < c_wide);
    }
}
