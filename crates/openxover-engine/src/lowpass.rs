//! Low-pass section component formulas.
//!
//! Classic normalized-prototype tables scaled to the terminating resistance:
//! values are chosen so the section corners at `f0` into a load of `r` ohms.
//! First order is a single series inductor; second order is a series-L /
//! shunt-C ladder whose damping is picked by the alignment:
//!   - Bessel: maximally flat group delay
//!   - Butterworth: maximally flat magnitude (-3 dB at f0)
//!   - Linkwitz-Riley: -6 dB at f0, flat when summed with its high-pass twin
//!   - Variable-Q: damping from an explicit quality factor

use crate::catalog::Alignment;

/// First-order series inductance: L = R / (2π·f0).
pub fn first_order_inductance(r: f64, f0: f64) -> f64 {
    0.159155 * r / f0
}

/// Second-order (series L, shunt C) values for the chosen alignment.
/// `q` is only read by the variable-Q alignment.
pub fn second_order_values(alignment: Alignment, r: f64, f0: f64, q: f64) -> (f64, f64) {
    match alignment {
        Alignment::Bessel => (0.2167 * r / f0, 0.0722 / r / f0),
        Alignment::Butterworth => (0.2251 * r / f0, 0.1125 / r / f0),
        Alignment::LinkwitzRiley => (0.3183 * r / f0, 0.0796 / r / f0),
        Alignment::VariableQ => (0.1592 * r / q / f0, 0.1592 * q / r / f0),
    }
}
