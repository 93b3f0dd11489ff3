use crate::state::StateError;
use thiserror::Error;

/// Failures while assembling bodies and vehicles. Stepping never fails.
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("invalid initial state: {0}")]
    InvalidState(#[from] StateError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("inertia tensor must be finite, symmetric and positive definite")]
    InvalidInertia,

    #[error("unknown vehicle type: {0:?}")]
    UnknownVehicleType(String),
}
