use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Every precondition violation is reported synchronously to the caller of the
/// offending operation; nothing is recovered or defaulted internally.
#[derive(Debug, Error)]
pub enum SirError {
    /// A model parameter is out of its valid domain (N ≤ 0, negative rates, non-finite values).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A step size or time horizon is not a positive finite number.
    #[error("invalid step: {0}")]
    InvalidStep(String),

    /// No observed data exists for the requested region, or the series is empty.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// A plot window lies outside the recorded extent of a trajectory.
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

pub type Result<T> = std::result::Result<T, SirError>;
