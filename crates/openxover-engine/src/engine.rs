//! Session facade: one chain, at most one baseline, sweep entry points.
//!
//! A host drives exactly one `XoverEngine` per design session and re-sweeps
//! after every mutating call. The engine is single-threaded and synchronous;
//! mutation plus recalculation is not atomic, so a multi-threaded host must
//! wrap it in its own mutual exclusion.

use log::debug;

use crate::baseline::Baseline;
use crate::catalog::Topology;
use crate::chain::{Chain, DEFAULT_LOAD_OHMS, StageSnapshot};
use crate::error::Error;
use crate::stage::ParamUpdate;
use crate::sweep::{DEFAULT_END_HZ, DEFAULT_START_HZ, DEFAULT_STEP_DECADES, Sweep};

pub struct XoverEngine {
    chain: Chain,
    baseline: Option<Baseline>,
    baseline_visible: bool,
}

impl XoverEngine {
    pub fn new(load_r: f64) -> Self {
        Self {
            chain: Chain::new(load_r),
            baseline: None,
            baseline_visible: false,
        }
    }

    /// Read-only access to the network, e.g. for spot-frequency queries.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    // ─── Chain operations ───────────────────────────────────────────────

    pub fn append(&mut self, topology: Topology) -> usize {
        self.chain.append(topology)
    }

    pub fn append_default(&mut self) -> usize {
        self.chain.append_default()
    }

    pub fn move_left(&mut self, position: usize) {
        self.chain.move_left(position);
    }

    pub fn move_right(&mut self, position: usize) {
        self.chain.move_right(position);
    }

    pub fn change_topology(&mut self, position: usize, key: &str) -> Result<(), Error> {
        self.chain.change_topology(position, key)
    }

    pub fn set_params(&mut self, position: usize, update: ParamUpdate) -> Result<(), Error> {
        self.chain.set_params(position, update)
    }

    pub fn remove_at(&mut self, position: usize) -> Result<(), Error> {
        self.chain.remove_at(position)
    }

    pub fn remove_all(&mut self) {
        self.chain.remove_all();
    }

    pub fn set_load_resistance(&mut self, load_r: f64) {
        self.chain.set_load_resistance(load_r);
    }

    pub fn snapshot(&self) -> Vec<StageSnapshot> {
        self.chain.snapshot()
    }

    // ─── Baseline lifecycle ─────────────────────────────────────────────

    /// Install a measured baseline; replaces any previous one and makes it
    /// visible.
    pub fn set_baseline(
        &mut self,
        frequencies: Vec<f64>,
        magnitudes_db: Vec<f64>,
        phases_deg: Vec<f64>,
    ) -> Result<(), Error> {
        self.baseline = Some(Baseline::new(frequencies, magnitudes_db, phases_deg)?);
        self.baseline_visible = true;
        Ok(())
    }

    pub fn clear_baseline(&mut self) {
        if self.baseline.take().is_some() {
            self.baseline_visible = false;
            debug!("baseline cleared");
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline_visible(&self) -> bool {
        self.baseline_visible
    }

    pub fn set_baseline_visible(&mut self, visible: bool) {
        self.baseline_visible = visible;
    }

    // ─── Response analysis ──────────────────────────────────────────────

    /// Sweep the current network. The baseline is overlaid only while
    /// present and visible.
    pub fn sweep(&self, start_hz: f64, end_hz: f64, step_decades: f64) -> Sweep<'_> {
        let baseline = if self.baseline_visible {
            self.baseline.as_ref()
        } else {
            None
        };
        Sweep::new(&self.chain, baseline, start_hz, end_hz, step_decades)
    }

    /// Sweep the audible band at the default resolution.
    pub fn sweep_default(&self) -> Sweep<'_> {
        self.sweep(DEFAULT_START_HZ, DEFAULT_END_HZ, DEFAULT_STEP_DECADES)
    }
}

impl Default for XoverEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_OHMS)
    }
}
