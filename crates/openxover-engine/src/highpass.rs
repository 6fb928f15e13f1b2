//! High-pass section component formulas.
//!
//! Mirror of the low-pass tables: first order is a single series capacitor;
//! second order is a series-C / shunt-L ladder. Same alignment menu as the
//! low-pass family; the Linkwitz-Riley values are identical to the low-pass
//! ones (the two halves of a crossover share the prototype).

use crate::catalog::Alignment;

/// First-order series capacitance: C = 1 / (2π·f0·R).
pub fn first_order_capacitance(r: f64, f0: f64) -> f64 {
    0.159155 / r / f0
}

/// Second-order (shunt L, series C) values for the chosen alignment.
/// `q` is only read by the variable-Q alignment.
pub fn second_order_values(alignment: Alignment, r: f64, f0: f64, q: f64) -> (f64, f64) {
    match alignment {
        Alignment::Bessel => (0.3507 * r / f0, 0.1169 / r / f0),
        Alignment::Butterworth => (0.2251 * r / f0, 0.1125 / r / f0),
        Alignment::LinkwitzRiley => (0.3183 * r / f0, 0.0796 / r / f0),
        Alignment::VariableQ => (0.1592 * r / q / f0, 0.1592 * q / r / f0),
    }
}
