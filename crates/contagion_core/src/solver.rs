use nalgebra::Vector3;

use crate::error::{Result, SirError};
use crate::model::VectorField;

/// Classic Runge-Kutta 4th order stepper with a fixed step size.
///
/// One step costs four evaluations of the vector field; the update is
/// y + dt/6 · (k1 + 2k2 + 2k3 + k4). No clamping is applied to the result:
/// keeping the mathematical trajectory intact is the caller's contract.
pub struct Rk4;

impl Rk4 {
    /// Advances `y` from time `t` by one step of size `dt`.
    pub fn step(field: &impl VectorField, t: f64, y: &Vector3<f64>, dt: f64) -> Result<Vector3<f64>> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SirError::InvalidStep(format!(
                "dt must be finite and positive, got {dt}"
            )));
        }

        let half = 0.5 * dt;

        // k1 = f(t, y)
        let k1 = field.apply(t, y);
        // k2 = f(t + dt/2, y + dt*k1/2)
        let k2 = field.apply(t + half, &(y + k1.scale(half)));
        // k3 = f(t + dt/2, y + dt*k2/2)
        let k3 = field.apply(t + half, &(y + k2.scale(half)));
        // k4 = f(t + dt, y + dt*k3)
        let k4 = field.apply(t + dt, &(y + k3.scale(dt)));

        Ok(y + (k1 + k2.scale(2.0) + k3.scale(2.0) + k4).scale(dt / 6.0))
    }
}
