//! A single filter stage: topology, user parameters, derived component
//! values, and its contribution to the two-port solve.
//!
//! The derived values (l1, c1, r) are caches. They are recomputed only by
//! `recalculate`, from the parameters and the resistance seen looking
//! downstream — the chain invokes it after every mutation, so a stage's
//! caches are never stale between public operations.

use std::sync::atomic::{AtomicU64, Ordering};

use num_complex::Complex64;
use serde::Serialize;

use crate::catalog::Topology;
use crate::impedance::{capacitor, inductor, parallel, parallel_r};
use crate::{bell, highpass, lowpass, shelf};

static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Transfer ratio and input impedance looking downstream from one point of
/// the chain.
#[derive(Clone, Copy, Debug)]
pub struct TwoPort {
    /// Voltage ratio relative to everything downstream of this point.
    pub ratio: Complex64,
    /// Impedance seen looking downstream from this point.
    pub impedance: Complex64,
}

/// Read-only view of a stage's parameters. Fields that do not apply to the
/// stage's topology are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StageParams {
    /// Corner / center frequency in Hz.
    pub f0: f64,
    /// Quality factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    /// Gain step in dB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<f64>,
    /// Inductor parasitic series resistance in ohms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l1r: Option<f64>,
}

/// Partial parameter update. `None` keeps the current value; `Some(0.0)` is
/// a real zero (a parasitic resistance of 0 Ω is legitimate and must be
/// distinguishable from "not provided").
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParamUpdate {
    pub f0: Option<f64>,
    pub q: Option<f64>,
    pub db: Option<f64>,
    pub l1r: Option<f64>,
}

pub struct Stage {
    id: u64,
    order_id: u64,
    topology: Topology,
    // parameters
    f0: f64,
    q: f64,
    db: f64,
    l1r: f64,
    // derived component values
    l1: f64,
    c1: f64,
    r: f64,
}

impl Stage {
    /// Fresh stage with the topology's catalog defaults. The caller must
    /// recalculate once the stage is linked into a chain.
    pub(crate) fn new(topology: Topology) -> Self {
        let id = NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed);
        let defaults = topology.default_params();
        Self {
            id,
            order_id: id,
            topology,
            f0: defaults.f0,
            q: defaults.q.unwrap_or(1.0),
            db: defaults.db.unwrap_or(0.0),
            l1r: defaults.l1r.unwrap_or(0.0),
            l1: 0.0,
            c1: 0.0,
            r: 0.0,
        }
    }

    /// Process-wide identity, assigned once at creation.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ordering identity; survives in-place topology replacement.
    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub(crate) fn set_order_id(&mut self, order_id: u64) {
        self.order_id = order_id;
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn params(&self) -> StageParams {
        StageParams {
            f0: self.f0,
            q: self.topology.uses_q().then_some(self.q),
            db: self.topology.uses_db().then_some(self.db),
            l1r: self.topology.uses_l1r().then_some(self.l1r),
        }
    }

    /// Derived component values (inductance H, capacitance F, resistance Ω).
    /// Values a topology does not use stay at zero.
    pub fn derived_values(&self) -> (f64, f64, f64) {
        (self.l1, self.c1, self.r)
    }

    /// Merge a partial update. Fields the topology does not read are
    /// ignored. The chain recalculates immediately afterwards.
    pub(crate) fn apply(&mut self, update: ParamUpdate) {
        if let Some(f0) = update.f0 {
            self.f0 = f0;
        }
        if self.topology.uses_q() {
            if let Some(q) = update.q {
                self.q = q;
            }
        }
        if self.topology.uses_db() {
            if let Some(db) = update.db {
                self.db = db;
            }
        }
        if self.topology.uses_l1r() {
            if let Some(l1r) = update.l1r {
                self.l1r = l1r;
            }
        }
    }

    /// Recompute the derived component values from the parameters and the
    /// resistance seen looking downstream. Pure: same inputs, same caches.
    pub(crate) fn recalculate(&mut self, r_downstream: f64) {
        let r = r_downstream;
        match self.topology {
            Topology::LowPassFirstOrder => {
                self.l1 = lowpass::first_order_inductance(r, self.f0);
            }
            Topology::LowPassSecondOrder(alignment) => {
                let (l1, c1) = lowpass::second_order_values(alignment, r, self.f0, self.q);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::HighPassFirstOrder => {
                self.c1 = highpass::first_order_capacitance(r, self.f0);
            }
            Topology::HighPassSecondOrder(alignment) => {
                let (l1, c1) = highpass::second_order_values(alignment, r, self.f0, self.q);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::Notch => {
                let (l1, c1) = bell::notch_values(self.f0, self.q);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::BandPass => {
                let (l1, c1) = bell::bandpass_values(self.f0, self.q);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::BellDown => {
                self.r = bell::gain_resistance(r, self.db);
                let (l1, c1) = bell::bell_down_values(self.f0, self.q, self.l1r, self.r);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::BellUp => {
                self.r = bell::gain_resistance(r, self.db);
                let (l1, c1) = bell::bell_up_values(self.f0, self.q, self.l1r, self.r);
                self.l1 = l1;
                self.c1 = c1;
            }
            Topology::HighShelf => {
                let (c1, shunt) = shelf::high_shelf_values(r, self.f0, self.db);
                self.c1 = c1;
                self.r = shunt;
            }
            Topology::LowShelf => {
                let (l1, shunt) = shelf::low_shelf_values(r, self.f0, self.db);
                self.l1 = l1;
                self.r = shunt;
            }
        }
    }

    /// Fold this stage's contribution onto the downstream two-port state:
    /// combine impedances, then scale the running ratio by the local
    /// voltage divider.
    pub(crate) fn combine(&self, omega: f64, next: TwoPort) -> TwoPort {
        match self.topology {
            Topology::LowPassFirstOrder => series(self.l1i(omega), next),
            Topology::HighPassFirstOrder => series(self.c1i(omega), next),
            // ladder: shunt element in parallel with downstream, then the
            // series element on top
            Topology::LowPassSecondOrder(_) => ladder(self.c1i(omega), self.l1i(omega), next),
            Topology::HighPassSecondOrder(_) => ladder(self.l1i(omega), self.c1i(omega), next),
            Topology::Notch => series(parallel(self.l1i(omega), self.c1i(omega)), next),
            Topology::BandPass => series(self.l1i(omega) + self.c1i(omega), next),
            Topology::BellDown => {
                if self.r == 0.0 {
                    // zero gain resistance shorts the shunt: pure wire
                    return next;
                }
                // single admittance sum: at resonance the LC admittances
                // cancel and the resistor alone remains, with no
                // intermediate infinity
                let admittance = self.l1i(omega).inv()
                    + self.c1i(omega).inv()
                    + Complex64::new(self.r, 0.0).inv();
                series(admittance.inv(), next)
            }
            Topology::BellUp => {
                if self.r == 0.0 {
                    // zero gain resistance: the bypass resistor is a dead
                    // short around the resonator
                    return next;
                }
                series(parallel_r(self.l1i(omega) + self.c1i(omega), self.r), next)
            }
            Topology::HighShelf => series(parallel_r(self.c1i(omega), self.r), next),
            Topology::LowShelf => series(parallel_r(self.l1i(omega), self.r), next),
        }
    }

    fn l1i(&self, omega: f64) -> Complex64 {
        inductor(omega, self.l1, self.l1r)
    }

    fn c1i(&self, omega: f64) -> Complex64 {
        capacitor(omega, self.c1)
    }
}

fn series(own: Complex64, next: TwoPort) -> TwoPort {
    let impedance = next.impedance + own;
    TwoPort {
        ratio: next.ratio * (next.impedance / impedance),
        impedance,
    }
}

fn ladder(shunt: Complex64, series_element: Complex64, next: TwoPort) -> TwoPort {
    let section = parallel(shunt, next.impedance);
    let impedance = section + series_element;
    TwoPort {
        ratio: next.ratio * (section / impedance),
        impedance,
    }
}
