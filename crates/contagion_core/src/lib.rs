//! The `contagion_core` crate provides the numerical engine for the Contagion CLI:
//! a classical SIR (Susceptible-Infected-Recovered) compartmental model integrated
//! with a fixed-step fourth-order Runge-Kutta scheme.
//!
//! Key components:
//! - **Model**: `SirState`, `SirParameters`, and the `VectorField` trait with the
//!   textbook SIR equations (`SirModel`).
//! - **Solver**: `Rk4`, the classic four-stage fixed-step integrator.
//! - **Simulate**: drives a run over a time horizon and records a `Trajectory`.
//! - **Fit**: brute-force grid search of (β, γ) against observed case counts.
//! - **Data**: observed-data interfaces and the built-in per-country table.
//! - **Plot**: turns a trajectory window into the series a plotting front end consumes.

pub mod data;
pub mod error;
pub mod fit;
pub mod model;
pub mod plot;
pub mod simulate;
pub mod solver;
