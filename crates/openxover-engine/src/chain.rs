//! Ordered filter chain between the signal source and the terminating load.
//!
//! The chain owns every stage. Vector order is electrical order: the source
//! sits ahead of position 0 and the load resistance behind the last position,
//! so a half-linked chain is unrepresentable — there is nothing to re-wire,
//! only positions to move. Every mutating operation ends with a full
//! recalculation pass, because each stage's component formulas depend on the
//! resistance seen looking downstream; invalid arguments return an error and
//! leave the chain untouched.

use log::debug;
use num_complex::Complex64;
use serde::Serialize;

use crate::catalog::{Topology, TopologyInfo};
use crate::error::Error;
use crate::stage::{ParamUpdate, Stage, StageParams, TwoPort};

/// Nominal loudspeaker driver impedance used when no load is specified.
pub const DEFAULT_LOAD_OHMS: f64 = 8.0;

pub struct Chain {
    stages: Vec<Stage>,
    load_r: f64,
}

/// Read-only description of one stage, in chain order.
#[derive(Clone, Debug, Serialize)]
pub struct StageSnapshot {
    pub id: u64,
    pub order_id: u64,
    pub topology: TopologyInfo,
    pub params: StageParams,
}

impl Chain {
    pub fn new(load_r: f64) -> Self {
        Self {
            stages: Vec::new(),
            load_r,
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn load_resistance(&self) -> f64 {
        self.load_r
    }

    pub fn stage(&self, position: usize) -> Option<&Stage> {
        self.stages.get(position)
    }

    /// Append a stage of the given topology at the tail. Returns its
    /// position.
    pub fn append(&mut self, topology: Topology) -> usize {
        self.stages.push(Stage::new(topology));
        self.recalculate_all();
        let position = self.stages.len() - 1;
        debug!("appended {} at position {position}", topology.key());
        position
    }

    /// Append a stage of the default catalog topology.
    pub fn append_default(&mut self) -> usize {
        self.append(Topology::DEFAULT)
    }

    /// Swap the stage with its left neighbour. No-op at position 0 (and for
    /// positions past the tail).
    pub fn move_left(&mut self, position: usize) {
        if position == 0 || position >= self.stages.len() {
            return;
        }
        self.stages.swap(position - 1, position);
        self.recalculate_all();
    }

    /// Swap the stage with its right neighbour. No-op at the last position
    /// (and for positions past the tail).
    pub fn move_right(&mut self, position: usize) {
        if position + 1 >= self.stages.len() {
            return;
        }
        self.stages.swap(position, position + 1);
        self.recalculate_all();
    }

    /// Replace the stage in place with a fresh instance of the topology
    /// named by `key`. The new stage takes its catalog defaults, then
    /// inherits the outgoing stage's corner frequency and ordering id.
    pub fn change_topology(&mut self, position: usize, key: &str) -> Result<(), Error> {
        let topology = Topology::from_key(key).ok_or_else(|| Error::UnknownTopology {
            key: key.to_string(),
        })?;
        let old = self.stages.get(position).ok_or(Error::PositionOutOfRange {
            position,
            len: self.stages.len(),
        })?;

        let mut fresh = Stage::new(topology);
        fresh.apply(ParamUpdate {
            f0: Some(old.params().f0),
            ..Default::default()
        });
        fresh.set_order_id(old.order_id());
        self.stages[position] = fresh;
        self.recalculate_all();
        debug!("position {position} changed to {key}");
        Ok(())
    }

    /// Merge a partial parameter update into the stage at `position`.
    pub fn set_params(&mut self, position: usize, update: ParamUpdate) -> Result<(), Error> {
        let len = self.stages.len();
        let stage = self
            .stages
            .get_mut(position)
            .ok_or(Error::PositionOutOfRange { position, len })?;
        stage.apply(update);
        self.recalculate_all();
        Ok(())
    }

    /// Detach and drop the stage at `position`.
    pub fn remove_at(&mut self, position: usize) -> Result<(), Error> {
        if position >= self.stages.len() {
            return Err(Error::PositionOutOfRange {
                position,
                len: self.stages.len(),
            });
        }
        let removed = self.stages.remove(position);
        self.recalculate_all();
        debug!("removed {} from position {position}", removed.topology().key());
        Ok(())
    }

    /// Empty the chain; the source connects straight to the load.
    pub fn remove_all(&mut self) {
        self.stages.clear();
        debug!("chain cleared");
    }

    /// Update the terminating resistance. Every stage's component values
    /// depend on it, so everything is recalculated.
    pub fn set_load_resistance(&mut self, load_r: f64) {
        self.load_r = load_r;
        self.recalculate_all();
        debug!("load resistance set to {load_r} ohms");
    }

    /// Per-stage descriptions in chain order, for host consumption.
    pub fn snapshot(&self) -> Vec<StageSnapshot> {
        self.stages
            .iter()
            .map(|stage| StageSnapshot {
                id: stage.id(),
                order_id: stage.order_id(),
                topology: stage.topology().info(),
                params: stage.params(),
            })
            .collect()
    }

    /// Transfer ratio and input impedance of the whole network at the given
    /// angular frequency. The source is a pure pass-through, so this is the
    /// solve from position 0.
    pub fn response_at(&self, omega: f64) -> TwoPort {
        self.solve_from(0, omega)
    }

    /// Resistance seen looking downstream from the stage at `position`.
    /// Every stage delegates toward the load, which terminates the walk with
    /// its stored resistance.
    pub fn equivalent_resistance(&self, position: usize) -> f64 {
        self.downstream_resistance(position + 1)
    }

    /// Recursive two-port composition. `index` == len is the load: ratio
    /// 1∠0°, impedance the load resistance as a real value. Every stage
    /// combines its own impedance contribution onto the state solved for
    /// everything downstream of it.
    fn solve_from(&self, index: usize, omega: f64) -> TwoPort {
        match self.stages.get(index) {
            None => TwoPort {
                ratio: Complex64::new(1.0, 0.0),
                impedance: Complex64::new(self.load_r, 0.0),
            },
            Some(stage) => {
                let next = self.solve_from(index + 1, omega);
                stage.combine(omega, next)
            }
        }
    }

    /// Reactive stages do not change the DC resistance path, so the walk
    /// simply delegates until it reaches the load.
    fn downstream_resistance(&self, index: usize) -> f64 {
        if index >= self.stages.len() {
            self.load_r
        } else {
            self.downstream_resistance(index + 1)
        }
    }

    fn recalculate_all(&mut self) {
        for position in 0..self.stages.len() {
            let r = self.downstream_resistance(position + 1);
            self.stages[position].recalculate(r);
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_OHMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::hz_to_rad_per_second;
    use approx::assert_relative_eq;

    fn keys(chain: &Chain) -> Vec<String> {
        chain.snapshot().iter().map(|s| s.topology.key.clone()).collect()
    }

    #[test]
    fn test_empty_chain_is_transparent() {
        let chain = Chain::default();
        for hz in [20.0, 1000.0, 20_000.0] {
            let out = chain.response_at(hz_to_rad_per_second(hz));
            assert_eq!(out.ratio.norm(), 1.0);
            assert_eq!(out.ratio.arg(), 0.0);
            assert_eq!(out.impedance, Complex64::new(8.0, 0.0));
        }
    }

    #[test]
    fn test_append_defaults_to_first_catalog_entry() {
        let mut chain = Chain::default();
        let position = chain.append_default();
        assert_eq!(position, 0);
        assert_eq!(keys(&chain), vec!["bell-down-1-simple-bell-down"]);
    }

    #[test]
    fn test_equivalent_resistance_reaches_the_load() {
        let mut chain = Chain::new(6.0);
        chain.append(Topology::LowPassFirstOrder);
        chain.append(Topology::HighPassFirstOrder);
        assert_eq!(chain.equivalent_resistance(0), 6.0);
        assert_eq!(chain.equivalent_resistance(1), 6.0);
    }

    #[test]
    fn test_move_left_right_round_trip() {
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder);
        chain.append(Topology::HighPassFirstOrder);
        chain.append(Topology::Notch);
        let original = keys(&chain);
        let original_response = chain.response_at(hz_to_rad_per_second(440.0));

        chain.move_right(0);
        assert_eq!(
            keys(&chain),
            vec![
                "highpass-1-default".to_string(),
                "lowpass-1-default".to_string(),
                "notch-1-simple-notch".to_string(),
            ]
        );
        chain.move_left(1);
        assert_eq!(keys(&chain), original);

        let restored = chain.response_at(hz_to_rad_per_second(440.0));
        assert_eq!(restored.ratio, original_response.ratio);
    }

    #[test]
    fn test_move_at_boundaries_is_a_no_op() {
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder);
        chain.append(Topology::Notch);
        let before = keys(&chain);
        chain.move_left(0);
        chain.move_right(1);
        chain.move_left(99);
        chain.move_right(99);
        assert_eq!(keys(&chain), before);
    }

    #[test]
    fn test_change_topology_carries_corner_frequency_only() {
        let mut chain = Chain::default();
        chain.append(Topology::Notch);
        chain
            .set_params(
                0,
                ParamUpdate {
                    f0: Some(500.0),
                    q: Some(4.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let old_order_id = chain.snapshot()[0].order_id;

        chain.change_topology(0, "lowpass-1-default").unwrap();
        let snapshot = &chain.snapshot()[0];
        assert_eq!(snapshot.topology.key, "lowpass-1-default");
        assert_eq!(snapshot.params.f0, 500.0, "f0 carries over, not the default 2000");
        assert_eq!(snapshot.params.q, None, "q does not survive the swap");
        assert_eq!(snapshot.order_id, old_order_id);
    }

    #[test]
    fn test_change_topology_unknown_key_leaves_chain_intact() {
        let mut chain = Chain::default();
        chain.append(Topology::Notch);
        let before = chain.snapshot();

        let err = chain.change_topology(0, "lowpass-9-elliptic").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownTopology {
                key: "lowpass-9-elliptic".to_string()
            }
        );
        assert_eq!(chain.snapshot()[0].id, before[0].id);
        assert_eq!(chain.snapshot()[0].topology.key, before[0].topology.key);
    }

    #[test]
    fn test_change_topology_position_out_of_range() {
        let mut chain = Chain::default();
        let err = chain.change_topology(0, "lowpass-1-default").unwrap_err();
        assert_eq!(err, Error::PositionOutOfRange { position: 0, len: 0 });
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut chain = Chain::default();
        chain.append(Topology::Notch);
        assert_eq!(
            chain.remove_at(1),
            Err(Error::PositionOutOfRange { position: 1, len: 1 })
        );
        assert_eq!(chain.len(), 1);
        assert!(chain.remove_at(0).is_ok());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_remove_all_connects_source_to_load() {
        let mut chain = Chain::default();
        chain.append_default();
        chain.append_default();
        chain.remove_all();
        assert!(chain.is_empty());
        let out = chain.response_at(hz_to_rad_per_second(1000.0));
        assert_eq!(out.ratio.norm(), 1.0);
    }

    #[test]
    fn test_set_load_resistance_recalculates_every_stage() {
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder);
        chain.append(Topology::HighShelf);
        let before: Vec<_> = (0..chain.len())
            .map(|i| chain.stage(i).unwrap().derived_values())
            .collect();

        chain.set_load_resistance(4.0);
        for (i, old) in before.iter().enumerate() {
            let new = chain.stage(i).unwrap().derived_values();
            assert_ne!(&new, old, "stage {i} kept stale component values");
        }
    }

    #[test]
    fn test_set_load_resistance_changes_the_response() {
        // notch LC values do not scale with the load, so the divider against
        // the load resistance moves with it
        let mut chain = Chain::default();
        chain.append(Topology::Notch);
        let omega = hz_to_rad_per_second(800.0);
        let at_8 = chain.response_at(omega).ratio.norm();
        chain.set_load_resistance(4.0);
        let at_4 = chain.response_at(omega).ratio.norm();
        assert!(
            (at_8 - at_4).abs() > 1e-3,
            "load change must move the response: {at_8} vs {at_4}"
        );
    }

    #[test]
    fn test_first_order_sections_track_the_load() {
        // L scales with R, so the normalized low-pass response is
        // load-invariant: the corner follows the driver
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder);
        let omega = hz_to_rad_per_second(2000.0);
        let at_8 = chain.response_at(omega).ratio.norm();
        chain.set_load_resistance(4.0);
        let at_4 = chain.response_at(omega).ratio.norm();
        assert_relative_eq!(at_8, at_4, max_relative = 1e-9);
    }

    #[test]
    fn test_ladder_impedance_seen_from_source() {
        // a second-order low-pass into 8 ohms: well below the corner the
        // network is transparent and the input impedance is close to 8 ohms
        let mut chain = Chain::default();
        chain.append(Topology::LowPassSecondOrder(crate::catalog::Alignment::Butterworth));
        let out = chain.response_at(hz_to_rad_per_second(50.0));
        assert_relative_eq!(out.impedance.norm(), 8.0, max_relative = 0.05);
        assert_relative_eq!(out.ratio.norm(), 1.0, max_relative = 0.01);
    }
}
