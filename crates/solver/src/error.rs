use craftplan_core::InputError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("iterations must be non-zero")]
    ZeroIterations,
    #[error("fork count must be non-zero")]
    ZeroForkCount,
    #[error("furcated action count must be non-zero")]
    ZeroFurcatedActionCount,
    #[error("furcated action count {furcated} exceeds fork count {forks}")]
    FurcationExceedsForks { furcated: u32, forks: u32 },
    #[error("max step count must be non-zero")]
    ZeroMaxStepCount,
    #[error("score weight {0} is not a finite non-negative number")]
    InvalidWeight(&'static str),
    #[error("{0} is not a finite non-negative number")]
    InvalidConstant(&'static str),
    #[error("action pool is empty")]
    EmptyActionPool,
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for SolverError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
