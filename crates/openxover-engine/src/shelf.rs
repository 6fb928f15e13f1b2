//! Shelving section formulas — a first-order pass element shunted by the
//! gain resistance.
//!
//! A shelf is composed, in a fixed order, from two rules:
//!   1. derive the gain resistance from (db, downstream R), exactly as the
//!      bells do;
//!   2. compute the base first-order reactive value (high shelf: series
//!      capacitor; low shelf: series inductor) from (f0, downstream R).
//! At frequencies where the reactive element conducts, the stage is
//! transparent; where it blocks, the signal is forced through the resistor
//! and picks up the shelf step.

use crate::bell::gain_resistance;
use crate::highpass;
use crate::lowpass;

/// High-shelf values: (c1, shunt resistance).
pub fn high_shelf_values(r_downstream: f64, f0: f64, db: f64) -> (f64, f64) {
    let r = gain_resistance(r_downstream, db);
    (highpass::first_order_capacitance(r_downstream, f0), r)
}

/// Low-shelf values: (l1, shunt resistance).
pub fn low_shelf_values(r_downstream: f64, f0: f64, db: f64) -> (f64, f64) {
    let r = gain_resistance(r_downstream, db);
    (lowpass::first_order_inductance(r_downstream, f0), r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_values_match_first_order_sections() {
        let (c1, _) = high_shelf_values(8.0, 2000.0, 3.0);
        assert_relative_eq!(c1, highpass::first_order_capacitance(8.0, 2000.0));

        let (l1, _) = low_shelf_values(8.0, 200.0, 3.0);
        assert_relative_eq!(l1, lowpass::first_order_inductance(8.0, 200.0));
    }

    #[test]
    fn test_shunt_resistance_tracks_db() {
        let (_, r0) = high_shelf_values(8.0, 2000.0, 0.0);
        let (_, r3) = high_shelf_values(8.0, 2000.0, 3.0);
        let (_, r6) = high_shelf_values(8.0, 2000.0, 6.0);
        assert_eq!(r0, 0.0);
        assert!(r6 > r3 && r3 > 0.0);
    }
}
