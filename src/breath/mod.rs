//! Breath-signal post-processing
//!
//! Converts the chamber compartment of a [`Trajectory`] from µM to breath
//! parts-per-billion and extracts the peak. The conversion goes through the
//! ideal-gas molar volume (µM -> mM -> ppm -> ppb), and the peak follows the
//! first-maximum Cmax/Tmax convention.

use serde::{Deserialize, Serialize};

use crate::model::REPORTER_CHAMBER;
use crate::simulator::Trajectory;

/// Ideal-gas molar volume used for the gas-phase conversion (mL/mol)
pub const MOLAR_VOLUME_ML_PER_MOL: f64 = 24_450.0;

/// Convert a gas-phase concentration from µM to parts-per-billion.
///
/// ```
/// assert_eq!(breathsol::breath::micromolar_to_ppb(1.0), 24_450.0);
/// ```
#[inline]
pub fn micromolar_to_ppb(micromolar: f64) -> f64 {
    micromolar * 1e-6 * 1000.0 * MOLAR_VOLUME_ML_PER_MOL * 1000.0
}

/// Exact inverse of [`micromolar_to_ppb`]
#[inline]
pub fn ppb_to_micromolar(ppb: f64) -> f64 {
    ppb / (1e-6 * 1000.0 * MOLAR_VOLUME_ML_PER_MOL * 1000.0)
}

/// Peak of the exhaled-breath signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathPeak {
    /// Maximum breath concentration (ppb)
    pub cmax_ppb: f64,
    /// Time of the maximum (minutes)
    pub tmax_min: f64,
}

/// The exhaled-breath signal over the sampling grid
///
/// Holds the `(time, ppb)` series handed to the rendering and export
/// collaborators, with the peak index cached at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathProfile {
    times: Vec<f64>,
    ppb: Vec<f64>,
    cmax_idx: usize,
}

impl BreathProfile {
    /// Convert the chamber series of `trajectory` to ppb.
    ///
    /// Borrows the trajectory; nothing upstream is mutated.
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let ppb: Vec<f64> = trajectory
            .component(REPORTER_CHAMBER)
            .into_iter()
            .map(micromolar_to_ppb)
            .collect();
        Self::from_series(trajectory.times().to_vec(), ppb)
    }

    fn from_series(times: Vec<f64>, ppb: Vec<f64>) -> Self {
        // First index of the maximum; ties keep the earliest time.
        let mut cmax_idx = 0;
        for (i, &value) in ppb.iter().enumerate() {
            if value > ppb[cmax_idx] {
                cmax_idx = i;
            }
        }
        Self {
            times,
            ppb,
            cmax_idx,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn ppb(&self) -> &[f64] {
        &self.ppb
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Peak value and time, or `None` for an empty series
    pub fn peak(&self) -> Option<BreathPeak> {
        if self.is_empty() {
            return None;
        }
        Some(BreathPeak {
            cmax_ppb: self.ppb[self.cmax_idx],
            tmax_min: self.times[self.cmax_idx],
        })
    }

    /// Ordered `(time_min, ppb)` pairs for the rendering collaborator
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.ppb.iter().copied())
    }
}
