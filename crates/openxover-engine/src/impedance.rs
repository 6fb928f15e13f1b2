//! Complex impedance primitives for AC network analysis.
//!
//! Everything downstream of a chain position is reduced to a single complex
//! impedance, so stages only ever combine two-terminal elements: series,
//! parallel (admittance form), and parallel-with-a-real-resistor.

use num_complex::Complex64;

/// Inductor with parasitic series resistance: Z = esr + jωL.
pub fn inductor(omega: f64, l: f64, esr: f64) -> Complex64 {
    Complex64::new(esr, omega * l)
}

/// Ideal capacitor: Z = 1 / (jωC).
pub fn capacitor(omega: f64, c: f64) -> Complex64 {
    Complex64::new(0.0, omega * c).inv()
}

/// Two impedances in parallel, admittance form: 1 / (1/a + 1/b).
pub fn parallel(a: Complex64, b: Complex64) -> Complex64 {
    (a.inv() + b.inv()).inv()
}

/// Impedance in parallel with a real resistance, product-over-sum form:
/// (z·r) / (z + r). Exact at r = 0 — the resistor shorts the branch and the
/// combination is zero, with no intermediate infinity.
pub fn parallel_r(z: Complex64, r: f64) -> Complex64 {
    z * r / (z + r)
}
