use serde::{Deserialize, Serialize};

use crate::error::{Result, SirError};
use crate::model::{SirModel, SirParameters, SirState};
use crate::solver::Rk4;

/// One recorded instant of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub state: SirState,
}

/// The full time series produced by one simulation run.
///
/// Immutable after creation; a fresh trajectory is produced per [`run`] call
/// and no simulation state survives between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last recorded time, or 0 for an empty trajectory.
    pub fn end_time(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time)
    }

    /// Recorded point closest in time to `time`.
    pub fn nearest(&self, time: f64) -> Option<&TrajectoryPoint> {
        self.points
            .iter()
            .min_by(|a, b| (a.time - time).abs().total_cmp(&(b.time - time).abs()))
    }

    /// Recorded points with times inside `[start, end]`.
    ///
    /// A window reaching beyond the recorded horizon is an error, never
    /// clipped or extrapolated.
    pub fn window(&self, start: f64, end: f64) -> Result<&[TrajectoryPoint]> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
            return Err(SirError::InvalidRange(format!(
                "window [{start}, {end}] is not a valid time range"
            )));
        }
        if end > self.end_time() {
            return Err(SirError::InvalidRange(format!(
                "window end {end} is beyond the simulated horizon {}",
                self.end_time()
            )));
        }
        let lo = self
            .points
            .iter()
            .position(|p| p.time >= start)
            .unwrap_or(self.points.len());
        let hi = self
            .points
            .iter()
            .rposition(|p| p.time <= end)
            .map_or(lo, |i| i + 1);
        Ok(&self.points[lo..hi.max(lo)])
    }
}

/// Runs the model for `floor(t_end / dt)` fixed RK4 steps starting at t = 0.
///
/// The returned trajectory has `floor(t_end / dt) + 1` points, the initial
/// condition included. When `dt` does not evenly divide `t_end` the final
/// recorded time falls short of `t_end` rather than overstepping it.
pub fn run(initial: SirState, params: &SirParameters, t_end: f64, dt: f64) -> Result<Trajectory> {
    if !t_end.is_finite() || t_end <= 0.0 {
        return Err(SirError::InvalidStep(format!(
            "t_end must be finite and positive, got {t_end}"
        )));
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SirError::InvalidStep(format!(
            "dt must be finite and positive, got {dt}"
        )));
    }
    let model = SirModel::new(*params)?;

    let steps = (t_end / dt).floor() as usize;
    let mut points = Vec::with_capacity(steps + 1);
    points.push(TrajectoryPoint {
        time: 0.0,
        state: initial,
    });

    let mut y = initial.to_vector();
    for step in 1..=steps {
        // Recompute t from the step index so time does not accumulate drift.
        let t_prev = (step - 1) as f64 * dt;
        y = Rk4::step(&model, t_prev, &y, dt)?;
        points.push(TrajectoryPoint {
            time: step as f64 * dt,
            state: SirState::from_vector(&y),
        });
    }

    Ok(Trajectory { points })
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::error::SirError;
    use crate::model::{SirParameters, SirState};

    fn default_outbreak() -> (SirState, SirParameters) {
        (SirState::outbreak(10_000.0, 1.0), SirParameters::default())
    }

    #[test]
    fn floor_policy_pins_the_point_count() {
        let (initial, params) = default_outbreak();
        let trajectory = run(initial, &params, 10.0, 3.0).unwrap();
        let times: Vec<f64> = trajectory.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn trajectory_length_is_steps_plus_one() {
        let (initial, params) = default_outbreak();
        let trajectory = run(initial, &params, 100.0, 1.0).unwrap();
        assert_eq!(trajectory.len(), 101);
        assert_eq!(trajectory.end_time(), 100.0);
    }

    #[test]
    fn population_is_conserved_at_every_point() {
        let (initial, params) = default_outbreak();
        let trajectory = run(initial, &params, 160.0, 1.0).unwrap();
        for point in trajectory.points() {
            let drift = (point.state.total() - params.population).abs();
            assert!(
                drift < 1e-6 * params.population,
                "t = {}: |S+I+R - N| = {drift}",
                point.time
            );
        }
    }

    #[test]
    fn extinct_disease_is_a_fixed_point() {
        let params = SirParameters::default();
        let initial = SirState::outbreak(10_000.0, 0.0);
        let trajectory = run(initial, &params, 50.0, 0.5).unwrap();
        for point in trajectory.points() {
            assert_eq!(point.state, initial);
        }
    }

    #[test]
    fn without_recovery_infection_grows_and_susceptibles_shrink() {
        let params = SirParameters::new(0.3, 0.0, 1000.0).unwrap();
        let initial = SirState::outbreak(1000.0, 10.0);
        let trajectory = run(initial, &params, 30.0, 0.5).unwrap();
        let points = trajectory.points();
        for pair in points.windows(2) {
            assert!(pair[1].state.infected >= pair[0].state.infected);
            assert!(pair[1].state.susceptible <= pair[0].state.susceptible);
        }
        for point in points {
            assert_eq!(point.state.recovered, 0.0);
            let si = point.state.susceptible + point.state.infected;
            assert!((si - 1000.0).abs() < 1e-9);
        }
    }

    #[test]
    fn halving_dt_shrinks_the_error_by_about_sixteen() {
        let params = SirParameters::new(0.5, 0.25, 1000.0).unwrap();
        let initial = SirState::outbreak(1000.0, 10.0);
        let t_end = 10.0;

        let final_infected = |dt: f64| {
            let trajectory = run(initial, &params, t_end, dt).unwrap();
            trajectory.points().last().unwrap().state.infected
        };

        let reference = final_infected(1.0 / 128.0);
        let coarse_error = (final_infected(1.0) - reference).abs();
        let fine_error = (final_infected(0.5) - reference).abs();
        let ratio = coarse_error / fine_error;
        // Fourth-order convergence: the asymptotic ratio is 2^4 = 16.
        assert!(
            (8.0..32.0).contains(&ratio),
            "error ratio {ratio} is not consistent with an order-4 method"
        );
    }

    #[test]
    fn run_rejects_bad_horizons_and_parameters() {
        let (initial, params) = default_outbreak();
        assert!(matches!(
            run(initial, &params, 0.0, 1.0),
            Err(SirError::InvalidStep(_))
        ));
        assert!(matches!(
            run(initial, &params, 10.0, 0.0),
            Err(SirError::InvalidStep(_))
        ));
        let bad_params = SirParameters {
            population: 0.0,
            ..SirParameters::default()
        };
        assert!(matches!(
            run(initial, &bad_params, 10.0, 1.0),
            Err(SirError::InvalidParameter(_))
        ));
    }

    #[test]
    fn identical_runs_are_bitwise_identical() {
        let (initial, params) = default_outbreak();
        let a = run(initial, &params, 60.0, 0.25).unwrap();
        let b = run(initial, &params, 60.0, 0.25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn window_selects_recorded_points_only() {
        let (initial, params) = default_outbreak();
        let trajectory = run(initial, &params, 10.0, 1.0).unwrap();

        let slice = trajectory.window(2.0, 5.0).unwrap();
        let times: Vec<f64> = slice.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0, 5.0]);

        let full = trajectory.window(0.0, trajectory.end_time()).unwrap();
        assert_eq!(full.len(), trajectory.len());

        assert!(matches!(
            trajectory.window(0.0, 20.0),
            Err(SirError::InvalidRange(_))
        ));
        assert!(matches!(
            trajectory.window(-1.0, 5.0),
            Err(SirError::InvalidRange(_))
        ));
        assert!(matches!(
            trajectory.window(5.0, 2.0),
            Err(SirError::InvalidRange(_))
        ));
    }
}
