//! Measured baseline response, normalized for overlay on simulated curves.
//!
//! A real acoustic measurement rarely sits at 0 dB, and pinning the single
//! loudest sample to 0 dB lets one outlier drag the whole curve down.
//! Instead: shift so the maximum is 0 dB, then vote — count how many rounded
//! samples fall at each integer attenuation from 0 to -11 dB and lift the
//! most populated level back to 0 dB. Measurements have one dominant flat
//! region, and the vote finds it.
//!
//! Built once from the host-supplied arrays, never mutated afterwards.

use log::debug;

use crate::error::Error;
use crate::units::db_to_ratio;

/// Integer attenuation levels considered by the normalization vote
/// (0 .. -11 dB). Samples below the range do not vote.
pub const NORMALIZATION_DB_LIMIT: usize = 12;

#[derive(Debug)]
pub struct Baseline {
    frequencies: Vec<f64>,
    phases_deg: Vec<f64>,
    /// Normalized magnitudes as linear ratios, parallel to `frequencies`.
    linear: Vec<f64>,
}

/// Baseline magnitude (linear ratio) and phase at one stored sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineSample {
    pub linear: f64,
    pub phase_deg: f64,
}

impl Baseline {
    /// Build from parallel arrays: frequencies in Hz (ascending), magnitudes
    /// in dB, phases in degrees.
    pub fn new(
        frequencies: Vec<f64>,
        magnitudes_db: Vec<f64>,
        phases_deg: Vec<f64>,
    ) -> Result<Self, Error> {
        if frequencies.is_empty()
            || frequencies.len() != magnitudes_db.len()
            || frequencies.len() != phases_deg.len()
        {
            return Err(Error::BaselineShape {
                frequencies: frequencies.len(),
                magnitudes: magnitudes_db.len(),
                phases: phases_deg.len(),
            });
        }

        let linear = normalize(&magnitudes_db);
        debug!(
            "baseline loaded: {} samples spanning {:.1}-{:.1} Hz",
            frequencies.len(),
            frequencies[0],
            frequencies[frequencies.len() - 1]
        );
        Ok(Self {
            frequencies,
            phases_deg,
            linear,
        })
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Values at the stored sample nearest to `hz`.
    ///
    /// Frequencies are ascending, so the distance to `hz` shrinks and then
    /// grows again; the scan stops at the turning point. A query below the
    /// first sample never improves on it and returns the first sample's
    /// values.
    pub fn value_at(&self, hz: f64) -> BaselineSample {
        let mut sample = BaselineSample {
            linear: self.linear[0],
            phase_deg: self.phases_deg[0],
        };
        let mut last_delta = f64::INFINITY;
        for (index, &frequency) in self.frequencies.iter().enumerate() {
            let delta = (hz - frequency).abs();
            if delta >= last_delta {
                break;
            }
            sample = BaselineSample {
                linear: self.linear[index],
                phase_deg: self.phases_deg[index],
            };
            last_delta = delta;
        }
        sample
    }
}

/// Shift, vote, lift: returns the normalized magnitudes as linear ratios.
fn normalize(magnitudes_db: &[f64]) -> Vec<f64> {
    let max = magnitudes_db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let shifted: Vec<f64> = magnitudes_db.iter().map(|m| m - max).collect();

    let mut buckets = [0usize; NORMALIZATION_DB_LIMIT];
    for magnitude in &shifted {
        let attenuation = -magnitude.round();
        if attenuation >= 0.0 && (attenuation as usize) < NORMALIZATION_DB_LIMIT {
            buckets[attenuation as usize] += 1;
        }
    }

    // most populated bucket wins; ties go to the lowest index (closest to
    // 0 dB)
    let mut winner = 0;
    for (index, &count) in buckets.iter().enumerate() {
        if count > buckets[winner] {
            winner = index;
        }
    }

    shifted
        .iter()
        .map(|m| db_to_ratio(m + winner as f64))
        .collect()
}
