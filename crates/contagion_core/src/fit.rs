use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::ObservedData;
use crate::error::{Result, SirError};
use crate::model::{SirParameters, SirState};
use crate::simulate::{self, Trajectory};

/// Inclusive (β, γ) lattice scanned by [`fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSearch {
    /// Transmission-rate range (low, high), both included.
    pub beta: (f64, f64),
    /// Recovery-rate range (low, high), both included.
    pub gamma: (f64, f64),
    /// Lattice points per axis; the scan evaluates `samples²` candidates.
    pub samples: usize,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            beta: (0.05, 0.6),
            gamma: (0.02, 0.5),
            samples: 25,
        }
    }
}

impl GridSearch {
    fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(SirError::InvalidParameter(format!(
                "grid search needs at least 2 samples per axis, got {}",
                self.samples
            )));
        }
        for (axis, (lo, hi)) in [("beta", self.beta), ("gamma", self.gamma)] {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
                return Err(SirError::InvalidParameter(format!(
                    "{axis} range ({lo}, {hi}) is not a valid non-negative interval"
                )));
            }
        }
        Ok(())
    }

    fn axis(&self, (lo, hi): (f64, f64), index: usize) -> f64 {
        lo + (hi - lo) * index as f64 / (self.samples - 1) as f64
    }
}

/// Best candidate found by [`fit`], with its sum-of-squares error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: SirParameters,
    pub sse: f64,
}

/// Brute-force least-squares scan of the (β, γ) lattice.
///
/// Every candidate is simulated from `initial` over the observed horizon and
/// scored with [`sum_squared_error`]; the minimizing pair wins, the first
/// minimum on ties. The lattice is exhausted and never refined — this is a
/// deliberate grid search, not a general optimizer. Each candidate runs on
/// its own copy of the state, so nothing is shared between evaluations.
pub fn fit(
    search: &GridSearch,
    initial: SirState,
    observed: &ObservedData,
    dt: f64,
) -> Result<FitResult> {
    search.validate()?;
    if observed.is_empty() {
        return Err(SirError::DataUnavailable(format!(
            "no observations for {:?}",
            observed.region()
        )));
    }

    // Cover the whole observed horizon, but always take at least one step.
    let t_end = observed.last_day().max(dt);
    let population = initial.total();

    let mut best: Option<FitResult> = None;
    for beta_index in 0..search.samples {
        let beta = search.axis(search.beta, beta_index);
        for gamma_index in 0..search.samples {
            let gamma = search.axis(search.gamma, gamma_index);
            let params = SirParameters::new(beta, gamma, population)?;
            let trajectory = simulate::run(initial, &params, t_end, dt)?;
            let sse = sum_squared_error(&trajectory, observed);
            debug!("candidate beta={beta:.4} gamma={gamma:.4} sse={sse:.4e}");
            if best.map_or(true, |b| sse < b.sse) {
                best = Some(FitResult { params, sse });
            }
        }
    }

    best.ok_or_else(|| {
        SirError::InvalidParameter("grid search produced no candidates".to_string())
    })
}

/// Sum of squared differences between simulated I(t) and the observed case
/// counts, each observation matched to the nearest recorded trajectory point.
pub fn sum_squared_error(trajectory: &Trajectory, observed: &ObservedData) -> f64 {
    observed
        .points()
        .iter()
        .filter_map(|obs| {
            trajectory.nearest(obs.day).map(|point| {
                let diff = point.state.infected - obs.cases;
                diff * diff
            })
        })
        .sum()
}
