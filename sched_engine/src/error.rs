//! Engine error types

use sched_types::AlgorithmKind;
use thiserror::Error;

/// Malformed scenario input
///
/// Raised before any run state exists. `index` fields are the zero-based
/// position of the offending process in the caller's list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Scenario contains no processes")]
    NoProcesses,

    #[error("Process {index}: arrival time {arrival_time} is negative")]
    NegativeArrival { index: usize, arrival_time: i64 },

    #[error("Process {index}: burst time {burst_time} must be positive")]
    NonPositiveBurst { index: usize, burst_time: i64 },

    #[error("Process {index}: I/O start {start} must lie within [0, {burst_time})")]
    IoStartOutOfRange {
        index: usize,
        start: i64,
        burst_time: i64,
    },

    #[error("Process {index}: I/O at {start} has non-positive duration {duration}")]
    NonPositiveIoDuration {
        index: usize,
        start: i64,
        duration: i64,
    },

    #[error("Process {index}: I/O at {start} does not start after the previous one at {previous}")]
    IoWindowsOutOfOrder {
        index: usize,
        start: i64,
        previous: i64,
    },

    #[error("{algorithm} requires parameter '{parameter}'")]
    MissingParameter {
        algorithm: AlgorithmKind,
        parameter: &'static str,
    },

    #[error("Quantum must be positive, got {0}")]
    InvalidQuantum(i64),

    #[error("MLFQ needs at least one queue, got {0}")]
    InvalidQueueCount(i64),

    #[error("MLFQ has {queues} queues but {quantums} quantums")]
    QuantumCountMismatch { queues: i64, quantums: usize },

    #[error("MLFQ level {level} quantum must be positive, got {quantum}")]
    InvalidLevelQuantum { level: usize, quantum: i64 },

    #[error("MLFQ allotment must be positive, got {0}")]
    InvalidAllotment(i64),
}

/// Errors produced by a simulation run
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The scenario was rejected; no run state was created
    #[error("Invalid scenario: {0}")]
    Validation(#[from] ValidationError),

    /// The run did not terminate within the configured tick ceiling
    ///
    /// This indicates a policy or configuration defect in the engine, not
    /// bad user input.
    #[error("Simulation did not finish within {ceiling} ticks")]
    TickCeilingReached { ceiling: u64 },
}

impl SimulationError {
    /// True for errors caused by caller input
    pub fn is_user_error(&self) -> bool {
        matches!(self, SimulationError::Validation(_))
    }
}
