use serde::Serialize;

use crate::data::ObservedData;
use crate::error::Result;
use crate::model::SirState;
use crate::simulate::{Trajectory, TrajectoryPoint};

/// A named polyline in the `[time, value]` form plotting front ends consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    fn from_window(name: &str, window: &[TrajectoryPoint], f: fn(&SirState) -> f64) -> Self {
        Self {
            name: name.to_string(),
            points: window.iter().map(|p| [p.time, f(&p.state)]).collect(),
        }
    }
}

/// The S/I/R curves of `trajectory` over the display window `[start, end]`.
///
/// Fails with `InvalidRange` when the window leaves the recorded horizon.
pub fn curves(trajectory: &Trajectory, start: f64, end: f64) -> Result<Vec<Series>> {
    let window = trajectory.window(start, end)?;
    Ok(vec![
        Series::from_window("susceptible", window, |s| s.susceptible),
        Series::from_window("infected", window, |s| s.infected),
        Series::from_window("recovered", window, |s| s.recovered),
    ])
}

/// Observed case counts as an overlay series.
pub fn overlay(observed: &ObservedData) -> Series {
    Series {
        name: format!("{} cases", observed.region()),
        points: observed
            .points()
            .iter()
            .map(|o| [o.day, o.cases])
            .collect(),
    }
}
