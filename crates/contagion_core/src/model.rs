use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::data::CountryRecord;
use crate::error::{Result, SirError};

/// Compartment counts at one instant.
///
/// The model operates on absolute population counts (not normalized
/// fractions), so the conservation invariant is S + I + R = N.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirState {
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
}

impl SirState {
    pub fn new(susceptible: f64, infected: f64, recovered: f64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
        }
    }

    /// Standard outbreak start: everyone susceptible except the seed cases.
    pub fn outbreak(population: f64, initial_infected: f64) -> Self {
        Self {
            susceptible: population - initial_infected,
            infected: initial_infected,
            recovered: 0.0,
        }
    }

    /// Moves `percent` of the total population from S into R before the
    /// outbreak, modeling innate (pre-existing) immunity. The total is
    /// unchanged, so S + I + R = N still holds.
    pub fn with_innate_immune_percent(self, percent: f64) -> Result<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(SirError::InvalidParameter(format!(
                "immune percentage must be in [0, 100], got {percent}"
            )));
        }
        let immune = self.total() * percent / 100.0;
        if immune > self.susceptible {
            return Err(SirError::InvalidParameter(format!(
                "cannot mark {immune} individuals immune with only {} susceptible",
                self.susceptible
            )));
        }
        Ok(Self {
            susceptible: self.susceptible - immune,
            infected: self.infected,
            recovered: self.recovered + immune,
        })
    }

    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.recovered
    }

    pub(crate) fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.susceptible, self.infected, self.recovered)
    }

    pub(crate) fn from_vector(v: &Vector3<f64>) -> Self {
        Self {
            susceptible: v[0],
            infected: v[1],
            recovered: v[2],
        }
    }
}

/// Contact-based decomposition of the transmission rate: β = contacts × risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactModel {
    /// Daily contacts of one infectious person.
    pub contacts_per_day: f64,
    /// Probability of transmission in one contact between an S and an I person.
    pub transmission_probability: f64,
}

impl ContactModel {
    pub fn beta(&self) -> f64 {
        self.contacts_per_day * self.transmission_probability
    }

    /// More (or fewer, if negative) daily contacts per infectious person.
    pub fn with_additional_contacts(self, contacts: f64) -> Self {
        Self {
            contacts_per_day: self.contacts_per_day + contacts,
            ..self
        }
    }

    /// Relative change in the per-contact transmission risk, e.g. -0.3 when
    /// mask wearing makes each contact 30% less risky.
    pub fn scale_transmission_probability(self, percent_change: f64) -> Self {
        Self {
            transmission_probability: self.transmission_probability * (1.0 + percent_change),
            ..self
        }
    }
}

/// Rate constants and population size for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirParameters {
    /// Transmission rate β (per day).
    pub beta: f64,
    /// Recovery rate γ (per day).
    pub gamma: f64,
    /// Total population N.
    pub population: f64,
}

impl Default for SirParameters {
    fn default() -> Self {
        Self {
            beta: 0.5,
            gamma: 0.25,
            population: 10_000.0,
        }
    }
}

impl SirParameters {
    pub fn new(beta: f64, gamma: f64, population: f64) -> Result<Self> {
        let params = Self {
            beta,
            gamma,
            population,
        };
        params.validate()?;
        Ok(params)
    }

    /// Builds parameters from a contact model, as in β = contacts × risk.
    pub fn from_contacts(contacts: ContactModel, gamma: f64, population: f64) -> Result<Self> {
        Self::new(contacts.beta(), gamma, population)
    }

    /// Relative change in the recovery rate, e.g. 0.3 when a new drug makes
    /// recovery 30% more likely per day.
    pub fn scale_recovery_rate(self, percent_change: f64) -> Result<Self> {
        Self::new(self.beta, self.gamma * (1.0 + percent_change), self.population)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.population.is_finite() || self.population <= 0.0 {
            return Err(SirError::InvalidParameter(format!(
                "population must be finite and positive, got {}",
                self.population
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(SirError::InvalidParameter(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(SirError::InvalidParameter(format!(
                "gamma must be finite and non-negative, got {}",
                self.gamma
            )));
        }
        Ok(())
    }
}

/// A time-dependent vector field on the three SIR compartments (S, I, R).
pub trait VectorField {
    /// Evaluates dy/dt at time `t` and state `y`.
    fn apply(&self, t: f64, y: &Vector3<f64>) -> Vector3<f64>;
}

/// The textbook SIR equations for a fixed parameter set:
///
/// dS/dt = −βSI/N, dI/dt = βSI/N − γI, dR/dt = γI.
#[derive(Debug, Clone, Copy)]
pub struct SirModel {
    params: SirParameters,
}

impl SirModel {
    pub fn new(params: SirParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SirParameters {
        &self.params
    }

    /// Instantaneous rate of change at `state`. Pure and deterministic.
    pub fn derivative(&self, state: &SirState) -> SirState {
        SirState::from_vector(&self.apply(0.0, &state.to_vector()))
    }
}

impl VectorField for SirModel {
    fn apply(&self, _t: f64, y: &Vector3<f64>) -> Vector3<f64> {
        let SirParameters {
            beta,
            gamma,
            population,
        } = self.params;
        // S·I/N is exactly zero when I = 0, so extinction is an exact equilibrium.
        let infection = beta * y[0] * y[1] / population;
        let recovery = gamma * y[1];
        Vector3::new(-infection, infection - recovery, recovery)
    }
}

/// A ready-to-run (parameters, initial state) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub params: SirParameters,
    pub initial: SirState,
}

impl Scenario {
    /// Seeds a run from a country record: its fitted β, census population,
    /// and current case count. Not all countries report recovered counts,
    /// so the initial recovered compartment is assumed empty.
    pub fn for_country(record: &CountryRecord, gamma: f64) -> Result<Self> {
        let params = SirParameters::new(record.beta, gamma, record.population)?;
        let initial = SirState::outbreak(record.population, record.current_cases);
        Ok(Self { params, initial })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactModel, Scenario, SirModel, SirParameters, SirState};
    use crate::data::CountryTable;
    use crate::error::SirError;

    #[test]
    fn derivative_matches_textbook_equations() {
        let params = SirParameters::new(0.5, 0.25, 1000.0).unwrap();
        let model = SirModel::new(params).unwrap();
        let d = model.derivative(&SirState::new(900.0, 100.0, 0.0));
        // dS = -0.5 * 900 * 100 / 1000, dI = 45 - 25, dR = 25.
        assert!((d.susceptible + 45.0).abs() < 1e-12);
        assert!((d.infected - 20.0).abs() < 1e-12);
        assert!((d.recovered - 25.0).abs() < 1e-12);
    }

    #[test]
    fn extinct_disease_has_exactly_zero_derivative() {
        let model = SirModel::new(SirParameters::default()).unwrap();
        let d = model.derivative(&SirState::new(10_000.0, 0.0, 0.0));
        assert_eq!(d.susceptible, 0.0);
        assert_eq!(d.infected, 0.0);
        assert_eq!(d.recovered, 0.0);
    }

    #[test]
    fn parameters_reject_invalid_values() {
        assert!(matches!(
            SirParameters::new(0.5, 0.25, 0.0),
            Err(SirError::InvalidParameter(_))
        ));
        assert!(matches!(
            SirParameters::new(-0.1, 0.25, 1000.0),
            Err(SirError::InvalidParameter(_))
        ));
        assert!(matches!(
            SirParameters::new(0.5, -0.1, 1000.0),
            Err(SirError::InvalidParameter(_))
        ));
        assert!(matches!(
            SirParameters::new(f64::NAN, 0.25, 1000.0),
            Err(SirError::InvalidParameter(_))
        ));
    }

    #[test]
    fn beta_is_contacts_times_risk() {
        let contacts = ContactModel {
            contacts_per_day: 10.0,
            transmission_probability: 0.019,
        };
        let params = SirParameters::from_contacts(contacts, 0.1, 10_000.0).unwrap();
        assert!((params.beta - 0.19).abs() < 1e-12);

        let riskier = contacts
            .with_additional_contacts(10.0)
            .scale_transmission_probability(0.5);
        assert!((riskier.beta() - 20.0 * 0.0285).abs() < 1e-12);
    }

    #[test]
    fn recovery_rate_scales_relatively() {
        let params = SirParameters::new(0.5, 0.2, 1000.0).unwrap();
        let faster = params.scale_recovery_rate(0.3).unwrap();
        assert!((faster.gamma - 0.26).abs() < 1e-12);
        assert!(matches!(
            params.scale_recovery_rate(-2.0),
            Err(SirError::InvalidParameter(_))
        ));
    }

    #[test]
    fn innate_immunity_moves_susceptibles_into_recovered() {
        let state = SirState::outbreak(10_000.0, 1.0)
            .with_innate_immune_percent(30.0)
            .unwrap();
        assert!((state.recovered - 3000.0).abs() < 1e-9);
        assert!((state.susceptible - 6999.0).abs() < 1e-9);
        assert!((state.total() - 10_000.0).abs() < 1e-9);

        assert!(matches!(
            SirState::outbreak(100.0, 1.0).with_innate_immune_percent(150.0),
            Err(SirError::InvalidParameter(_))
        ));
    }

    #[test]
    fn country_scenario_seeds_from_the_table() {
        let record = CountryTable::lookup("Italy").unwrap();
        let scenario = Scenario::for_country(record, 0.1).unwrap();
        assert_eq!(scenario.params.beta, 0.19);
        assert_eq!(scenario.initial.infected, 84_842.0);
        assert_eq!(scenario.initial.recovered, 0.0);
        assert!((scenario.initial.total() - scenario.params.population).abs() < 1e-9);
    }
}
