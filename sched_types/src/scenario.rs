//! Scenario descriptions supplied by callers

use crate::algorithm::{AlgorithmKind, AlgorithmParams};
use serde::{Deserialize, Serialize};

/// One I/O interval of a process
///
/// `start` is measured in CPU progress: the process blocks when it has
/// consumed exactly `start` ticks of its burst, and stays blocked for
/// `duration` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoSpec {
    pub start: i64,
    pub duration: i64,
}

impl IoSpec {
    pub fn new(start: i64, duration: i64) -> Self {
        Self { start, duration }
    }
}

/// Caller-supplied description of a single process
///
/// Values are signed and unvalidated so that malformed input reaches the
/// engine's validation instead of failing at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpec {
    pub arrival_time: i64,
    pub burst_time: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub io: Vec<IoSpec>,
}

impl ProcessSpec {
    /// A CPU-only process
    pub fn new(arrival_time: i64, burst_time: i64) -> Self {
        Self {
            arrival_time,
            burst_time,
            io: Vec::new(),
        }
    }

    /// Adds an I/O interval
    pub fn with_io(mut self, start: i64, duration: i64) -> Self {
        self.io.push(IoSpec::new(start, duration));
        self
    }
}

/// A complete simulation request: processes plus algorithm choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub processes: Vec<ProcessSpec>,
    pub algorithm: AlgorithmKind,
    #[serde(default)]
    pub params: AlgorithmParams,
}

impl Scenario {
    pub fn new(processes: Vec<ProcessSpec>, algorithm: AlgorithmKind) -> Self {
        Self {
            processes,
            algorithm,
            params: AlgorithmParams::default(),
        }
    }

    pub fn with_params(mut self, params: AlgorithmParams) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "processes": [
                {"arrivalTime": 0, "burstTime": 5},
                {"arrivalTime": 1, "burstTime": 3, "io": [{"start": 1, "duration": 2}]}
            ],
            "algorithm": "RR",
            "params": {"quantum": 2}
        }"#;

        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.algorithm, AlgorithmKind::RoundRobin);
        assert_eq!(scenario.params.quantum, Some(2));
        assert_eq!(scenario.processes[0], ProcessSpec::new(0, 5));
        assert_eq!(scenario.processes[1], ProcessSpec::new(1, 3).with_io(1, 2));
    }

    #[test]
    fn test_params_are_optional() {
        let json = r#"{"processes": [], "algorithm": "FCFS"}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.params, AlgorithmParams::default());
    }

    #[test]
    fn test_negative_values_survive_parsing() {
        let json = r#"{"arrivalTime": -1, "burstTime": 0}"#;
        let spec: ProcessSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.arrival_time, -1);
        assert_eq!(spec.burst_time, 0);
    }
}
