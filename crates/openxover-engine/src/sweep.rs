//! Logarithmic frequency sweep over the chain's transfer function.
//!
//! Samples sit at 10^(log10(start) + k·step) for k = 0, 1, 2, … — equal
//! spacing in log frequency, matching how response charts are drawn. The
//! sweep is a plain iterator: lazy, finite, and recomputed from scratch on
//! every call, since any chain mutation invalidates previous results.

use serde::Serialize;

use crate::baseline::Baseline;
use crate::chain::Chain;
use crate::units::{hz_to_rad_per_second, radians_to_degrees, ratio_to_db};

pub const DEFAULT_START_HZ: f64 = 20.0;
pub const DEFAULT_END_HZ: f64 = 20_000.0;
/// Sample spacing in log10 decades; 0.01 gives ~100 points per decade.
pub const DEFAULT_STEP_DECADES: f64 = 0.01;

/// One sample of a response sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    pub freq_hz: f64,
    pub mag_db: f64,
    pub phase_deg: f64,
}

pub struct Sweep<'a> {
    chain: &'a Chain,
    baseline: Option<&'a Baseline>,
    start_log: f64,
    /// Upper exponent bound. Runs one step past log10(end): the last sample
    /// may land up to one step above `end_hz`, padding the chart's right
    /// edge.
    end_log: f64,
    step: f64,
    k: u32,
}

impl<'a> Sweep<'a> {
    pub fn new(
        chain: &'a Chain,
        baseline: Option<&'a Baseline>,
        start_hz: f64,
        end_hz: f64,
        step_decades: f64,
    ) -> Self {
        Self {
            chain,
            baseline,
            start_log: start_hz.log10(),
            end_log: end_hz.log10() + step_decades,
            step: step_decades,
            k: 0,
        }
    }
}

impl Iterator for Sweep<'_> {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<SweepPoint> {
        let exponent = self.start_log + f64::from(self.k) * self.step;
        if exponent > self.end_log {
            return None;
        }
        self.k += 1;

        let freq_hz = 10f64.powf(exponent);
        let response = self.chain.response_at(hz_to_rad_per_second(freq_hz));
        let mut magnitude = response.ratio.norm();
        let mut phase_deg = radians_to_degrees(response.ratio.arg());

        if let Some(baseline) = self.baseline {
            let sample = baseline.value_at(freq_hz);
            magnitude *= sample.linear;
            phase_deg += sample.phase_deg;
        }

        Some(SweepPoint {
            freq_hz,
            mag_db: ratio_to_db(magnitude),
            phase_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Topology;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_spacing_is_logarithmic() {
        let chain = Chain::default();
        let points: Vec<_> = Sweep::new(&chain, None, 10.0, 1000.0, 0.25).collect();
        for pair in points.windows(2) {
            assert_relative_eq!(
                pair[1].freq_hz / pair[0].freq_hz,
                10f64.powf(0.25),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_sweep_overshoots_end_by_one_step() {
        // exponents 1.0, 1.25, …: the bound is log10(1000) + 0.25, so the
        // final sample sits above 1000 Hz
        let chain = Chain::default();
        let points: Vec<_> = Sweep::new(&chain, None, 10.0, 1000.0, 0.25).collect();
        assert_eq!(points.len(), 10);
        let last = points.last().unwrap().freq_hz;
        assert!(last > 1000.0, "last sample {last} should pad past the end");
        assert_relative_eq!(last, 10f64.powf(3.25), max_relative = 1e-9);
    }

    #[test]
    fn test_default_range_covers_the_audible_band() {
        let chain = Chain::default();
        let points: Vec<_> = Sweep::new(
            &chain,
            None,
            DEFAULT_START_HZ,
            DEFAULT_END_HZ,
            DEFAULT_STEP_DECADES,
        )
        .collect();
        // three decades at ~100 points per decade, plus the closing samples
        assert!(
            (300..=303).contains(&points.len()),
            "unexpected sample count {}",
            points.len()
        );
        assert_relative_eq!(points[0].freq_hz, 20.0, max_relative = 1e-9);
        assert!(points.last().unwrap().freq_hz >= 20_000.0 * 0.999);
    }

    #[test]
    fn test_empty_chain_sweeps_flat() {
        let chain = Chain::default();
        for point in Sweep::new(&chain, None, 20.0, 20_000.0, 0.05) {
            assert_eq!(point.mag_db, 0.0);
            assert_eq!(point.phase_deg, 0.0);
        }
    }

    #[test]
    fn test_sweep_is_restartable() {
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder);
        let first: Vec<_> = Sweep::new(&chain, None, 20.0, 20_000.0, 0.1).collect();
        let second: Vec<_> = Sweep::new(&chain, None, 20.0, 20_000.0, 0.1).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lowpass_corner_attenuation() {
        let mut chain = Chain::default();
        chain.append(Topology::LowPassFirstOrder); // f0 = 2000 Hz
        let points: Vec<_> = Sweep::new(&chain, None, 20.0, 20_000.0, 0.01).collect();

        let corner = points
            .iter()
            .min_by(|a, b| {
                (a.freq_hz - 2000.0)
                    .abs()
                    .total_cmp(&(b.freq_hz - 2000.0).abs())
            })
            .unwrap();
        assert_relative_eq!(corner.mag_db, -3.01, epsilon = 0.08);

        // monotonically non-increasing above the corner
        let mut above: Vec<_> = points.iter().filter(|p| p.freq_hz >= 2000.0).collect();
        above.sort_by(|a, b| a.freq_hz.total_cmp(&b.freq_hz));
        for pair in above.windows(2) {
            assert!(
                pair[1].mag_db <= pair[0].mag_db + 1e-9,
                "response rose above the corner: {} dB @ {} Hz -> {} dB @ {} Hz",
                pair[0].mag_db,
                pair[0].freq_hz,
                pair[1].mag_db,
                pair[1].freq_hz
            );
        }
    }

    #[test]
    fn test_baseline_overlay_multiplies_and_adds() {
        use crate::baseline::Baseline;

        let chain = Chain::default();
        let baseline = Baseline::new(
            vec![10.0, 50_000.0],
            vec![0.0, 0.0],
            vec![15.0, 15.0],
        )
        .unwrap();
        let flat: Vec<_> = Sweep::new(&chain, None, 100.0, 1000.0, 0.5).collect();
        let overlaid: Vec<_> = Sweep::new(&chain, Some(&baseline), 100.0, 1000.0, 0.5).collect();
        for (bare, with) in flat.iter().zip(&overlaid) {
            assert_relative_eq!(with.mag_db, bare.mag_db, epsilon = 1e-12);
            assert_relative_eq!(with.phase_deg, bare.phase_deg + 15.0);
        }
    }
}
