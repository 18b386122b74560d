use crate::types::Specialist;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovernorError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Parameter Format Error: {0}")]
    Parameter(#[from] ParameterFormatError),

    #[error("Invariant Violation: {0}")]
    Invariant(#[from] InvariantError),
}

impl GovernorError {
    /// Fatal errors abort the current optimisation and drop the city's caches.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GovernorError::Invariant(_))
    }

    pub fn invariant(&self) -> Option<&InvariantError> {
        match self {
            GovernorError::Invariant(e) => Some(e),
            _ => None,
        }
    }
}

/// Conditions that can only arise from a bug or an undersized constant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error(
        "combination cache full at {workers} worker(s): {capacity} slots in use, raise combination_capacity"
    )]
    CapacityExhausted { workers: u32, capacity: usize },

    #[error(
        "oracle disagrees on {role} output for trade {trade}, headcount {headcount}: cached {cached:?}, fresh {fresh:?}"
    )]
    SecondaryMismatch {
        role: Specialist,
        trade: i32,
        headcount: u32,
        cached: (i32, i32),
        fresh: (i32, i32),
    },

    #[error(
        "oracle disagrees on mood for luxury {luxury}, {workers} worker(s): cached {cached:?}, fresh {fresh:?}"
    )]
    MoodMismatch {
        luxury: i32,
        workers: u32,
        cached: (bool, bool),
        fresh: (bool, bool),
    },

    #[error("{workers} worker(s) + {specialists} specialist(s) != population {population}")]
    PopulationMismatch {
        workers: u32,
        specialists: u32,
        population: u32,
    },
}

/// Rejections of a persisted parameter record. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterFormatError {
    #[error("record is {actual} bytes, expected {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("unknown record version {0}")]
    UnknownVersion(u8),

    #[error("unknown factor target {0}")]
    UnknownFactorTarget(u8),

    #[error("flag byte {0} is neither 0 nor 1")]
    InvalidFlag(u8),
}

pub type GovResult<T> = Result<T, GovernorError>;
