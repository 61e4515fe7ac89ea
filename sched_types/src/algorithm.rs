//! Algorithm selection and raw algorithm parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheduling algorithm identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// First come, first served
    #[serde(rename = "FCFS")]
    Fcfs,
    /// Shortest job first (non-preemptive)
    #[serde(rename = "SJF")]
    Sjf,
    /// Shortest time to completion first (preemptive SJF)
    #[serde(rename = "STCF")]
    Stcf,
    /// Round robin with a fixed quantum
    #[serde(rename = "RR")]
    RoundRobin,
    /// Multi-level feedback queue
    #[serde(rename = "MLFQ")]
    Mlfq,
}

impl AlgorithmKind {
    /// All supported algorithms, in a stable order
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::Fcfs,
        AlgorithmKind::Sjf,
        AlgorithmKind::Stcf,
        AlgorithmKind::RoundRobin,
        AlgorithmKind::Mlfq,
    ];

    /// Returns the canonical short name (`"FCFS"`, `"RR"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Fcfs => "FCFS",
            AlgorithmKind::Sjf => "SJF",
            AlgorithmKind::Stcf => "STCF",
            AlgorithmKind::RoundRobin => "RR",
            AlgorithmKind::Mlfq => "MLFQ",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an algorithm name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown scheduling algorithm '{}' (expected FCFS, SJF, STCF, RR or MLFQ)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" => Ok(AlgorithmKind::Fcfs),
            "SJF" => Ok(AlgorithmKind::Sjf),
            "STCF" | "SRTF" => Ok(AlgorithmKind::Stcf),
            "RR" | "ROUND_ROBIN" | "ROUNDROBIN" => Ok(AlgorithmKind::RoundRobin),
            "MLFQ" => Ok(AlgorithmKind::Mlfq),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Raw, unvalidated algorithm parameters as supplied by a caller
///
/// Every field is optional and signed: which fields are required, and
/// which values are acceptable, depends on the algorithm and is decided
/// by the engine when it builds a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlgorithmParams {
    /// RR time quantum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
    /// MLFQ queue count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queues: Option<i64>,
    /// MLFQ per-level quanta, highest priority first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantums: Option<Vec<i64>>,
    /// MLFQ priority boost period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allotment: Option<i64>,
}

impl AlgorithmParams {
    /// Parameters for round robin
    pub fn round_robin(quantum: i64) -> Self {
        Self {
            quantum: Some(quantum),
            ..Self::default()
        }
    }

    /// Parameters for MLFQ; the queue count is taken from `quantums`
    pub fn mlfq(quantums: Vec<i64>, allotment: i64) -> Self {
        Self {
            queues: Some(quantums.len() as i64),
            quantums: Some(quantums),
            allotment: Some(allotment),
            ..Self::default()
        }
    }

    /// Overlays every parameter set in `other` on top of `self`
    pub fn merged_with(mut self, other: &AlgorithmParams) -> Self {
        if other.quantum.is_some() {
            self.quantum = other.quantum;
        }
        if other.queues.is_some() {
            self.queues = other.queues;
        }
        if other.quantums.is_some() {
            self.quantums = other.quantums.clone();
        }
        if other.allotment.is_some() {
            self.allotment = other.allotment;
        }
        self
    }
}
