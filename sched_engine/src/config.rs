//! Run configuration and validated algorithm parameters

use crate::error::ValidationError;
use sched_types::{AlgorithmKind, AlgorithmParams};

/// Engine configuration for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Safety ceiling: the run fails once the clock reaches this tick
    /// without every process having finished. The driver raises it to cover
    /// the latest completion the workload allows.
    pub max_ticks: u64,
}

impl SimulationConfig {
    pub const DEFAULT_MAX_TICKS: u64 = 100_000;

    pub fn with_max_ticks(max_ticks: u64) -> Self {
        Self { max_ticks }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: Self::DEFAULT_MAX_TICKS,
        }
    }
}

/// A scheduling algorithm together with its validated parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmConfig {
    Fcfs,
    Sjf,
    Stcf,
    RoundRobin {
        quantum: u64,
    },
    Mlfq {
        /// Per-level quanta, level 0 first
        quantums: Vec<u64>,
        /// Priority boost period in ticks
        allotment: u64,
    },
}

impl AlgorithmConfig {
    /// Validates raw parameters for `kind`
    ///
    /// Parameters the algorithm does not use are ignored.
    pub fn from_params(
        kind: AlgorithmKind,
        params: &AlgorithmParams,
    ) -> Result<Self, ValidationError> {
        match kind {
            AlgorithmKind::Fcfs => Ok(AlgorithmConfig::Fcfs),
            AlgorithmKind::Sjf => Ok(AlgorithmConfig::Sjf),
            AlgorithmKind::Stcf => Ok(AlgorithmConfig::Stcf),
            AlgorithmKind::RoundRobin => {
                let quantum = params.quantum.ok_or(ValidationError::MissingParameter {
                    algorithm: kind,
                    parameter: "quantum",
                })?;
                if quantum <= 0 {
                    return Err(ValidationError::InvalidQuantum(quantum));
                }
                Ok(AlgorithmConfig::RoundRobin {
                    quantum: quantum as u64,
                })
            }
            AlgorithmKind::Mlfq => {
                let missing = |parameter| ValidationError::MissingParameter {
                    algorithm: kind,
                    parameter,
                };
                let queues = params.queues.ok_or_else(|| missing("queues"))?;
                let raw_quantums = params.quantums.as_ref().ok_or_else(|| missing("quantums"))?;
                let allotment = params.allotment.ok_or_else(|| missing("allotment"))?;

                if queues < 1 {
                    return Err(ValidationError::InvalidQueueCount(queues));
                }
                if raw_quantums.len() as i64 != queues {
                    return Err(ValidationError::QuantumCountMismatch {
                        queues,
                        quantums: raw_quantums.len(),
                    });
                }
                let mut quantums = Vec::with_capacity(raw_quantums.len());
                for (level, &quantum) in raw_quantums.iter().enumerate() {
                    if quantum <= 0 {
                        return Err(ValidationError::InvalidLevelQuantum { level, quantum });
                    }
                    quantums.push(quantum as u64);
                }
                if allotment <= 0 {
                    return Err(ValidationError::InvalidAllotment(allotment));
                }

                Ok(AlgorithmConfig::Mlfq {
                    quantums,
                    allotment: allotment as u64,
                })
            }
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            AlgorithmConfig::Fcfs => AlgorithmKind::Fcfs,
            AlgorithmConfig::Sjf => AlgorithmKind::Sjf,
            AlgorithmConfig::Stcf => AlgorithmKind::Stcf,
            AlgorithmConfig::RoundRobin { .. } => AlgorithmKind::RoundRobin,
            AlgorithmConfig::Mlfq { .. } => AlgorithmKind::Mlfq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceiling() {
        assert_eq!(SimulationConfig::default().max_ticks, 100_000);
    }

    #[test]
    fn test_parameterless_algorithms_ignore_params() {
        let params = AlgorithmParams::round_robin(-5);
        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Sjf, &params),
            Ok(AlgorithmConfig::Sjf)
        );
    }

    #[test]
    fn test_round_robin_requires_positive_quantum() {
        let missing = AlgorithmConfig::from_params(
            AlgorithmKind::RoundRobin,
            &AlgorithmParams::default(),
        );
        assert_eq!(
            missing,
            Err(ValidationError::MissingParameter {
                algorithm: AlgorithmKind::RoundRobin,
                parameter: "quantum",
            })
        );

        let zero =
            AlgorithmConfig::from_params(AlgorithmKind::RoundRobin, &AlgorithmParams::round_robin(0));
        assert_eq!(zero, Err(ValidationError::InvalidQuantum(0)));

        let ok =
            AlgorithmConfig::from_params(AlgorithmKind::RoundRobin, &AlgorithmParams::round_robin(3));
        assert_eq!(ok, Ok(AlgorithmConfig::RoundRobin { quantum: 3 }));
    }

    #[test]
    fn test_mlfq_validation() {
        let ok = AlgorithmConfig::from_params(
            AlgorithmKind::Mlfq,
            &AlgorithmParams::mlfq(vec![2, 4], 6),
        );
        assert_eq!(
            ok,
            Ok(AlgorithmConfig::Mlfq {
                quantums: vec![2, 4],
                allotment: 6
            })
        );

        let mut mismatched = AlgorithmParams::mlfq(vec![2, 4], 6);
        mismatched.queues = Some(3);
        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Mlfq, &mismatched),
            Err(ValidationError::QuantumCountMismatch {
                queues: 3,
                quantums: 2
            })
        );

        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Mlfq, &AlgorithmParams::mlfq(vec![2, 0], 6)),
            Err(ValidationError::InvalidLevelQuantum {
                level: 1,
                quantum: 0
            })
        );

        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Mlfq, &AlgorithmParams::mlfq(vec![2], 0)),
            Err(ValidationError::InvalidAllotment(0))
        );

        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Mlfq, &AlgorithmParams::mlfq(vec![], 5)),
            Err(ValidationError::InvalidQueueCount(0))
        );
    }

    #[test]
    fn test_mlfq_reports_first_missing_parameter() {
        let params = AlgorithmParams {
            queues: Some(2),
            ..AlgorithmParams::default()
        };
        assert_eq!(
            AlgorithmConfig::from_params(AlgorithmKind::Mlfq, &params),
            Err(ValidationError::MissingParameter {
                algorithm: AlgorithmKind::Mlfq,
                parameter: "quantums",
            })
        );
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(
            AlgorithmConfig::RoundRobin { quantum: 1 }.kind(),
            AlgorithmKind::RoundRobin
        );
        assert_eq!(
            AlgorithmConfig::Mlfq {
                quantums: vec![1],
                allotment: 1
            }
            .kind(),
            AlgorithmKind::Mlfq
        );
    }
}
