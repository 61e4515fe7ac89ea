//! Host configuration

use clap::ValueEnum;
use sched_engine::SimulationConfig;
use sched_types::{AlgorithmKind, AlgorithmParams, Scenario};
use std::path::PathBuf;

/// Report encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Full report as JSON
    Json,
    /// Gantt chart, per-process table and summary
    #[default]
    Text,
}

/// Algorithm settings given on the command line
///
/// Anything set here replaces the matching value from the scenario file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmOverrides {
    pub algorithm: Option<AlgorithmKind>,
    pub quantum: Option<i64>,
    pub quantums: Option<Vec<i64>>,
    pub allotment: Option<i64>,
}

impl AlgorithmOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlays the overrides on `scenario`
    ///
    /// Overriding the MLFQ quanta also sets the queue count to match.
    pub fn apply(&self, mut scenario: Scenario) -> Scenario {
        if let Some(algorithm) = self.algorithm {
            scenario.algorithm = algorithm;
        }
        let params = AlgorithmParams {
            quantum: self.quantum,
            queues: self.quantums.as_ref().map(|quantums| quantums.len() as i64),
            quantums: self.quantums.clone(),
            allotment: self.allotment,
        };
        scenario.params = scenario.params.merged_with(&params);
        scenario
    }
}

/// Host configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Scenario JSON file
    pub scenario_path: PathBuf,
    pub format: OutputFormat,
    /// Minimum safety ceiling on simulated ticks
    pub max_ticks: u64,
    /// Append the per-tick event explanations to text output
    pub explain: bool,
    pub overrides: AlgorithmOverrides,
}

impl HostConfig {
    pub fn new(scenario_path: impl Into<PathBuf>) -> Self {
        Self {
            scenario_path: scenario_path.into(),
            format: OutputFormat::default(),
            max_ticks: SimulationConfig::default().max_ticks,
            explain: false,
            overrides: AlgorithmOverrides::default(),
        }
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::with_max_ticks(self.max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_types::ProcessSpec;

    fn rr_scenario() -> Scenario {
        Scenario::new(vec![ProcessSpec::new(0, 4)], AlgorithmKind::RoundRobin)
            .with_params(AlgorithmParams::round_robin(2))
    }

    #[test]
    fn test_empty_overrides_keep_scenario() {
        let overrides = AlgorithmOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(rr_scenario()), rr_scenario());
    }

    #[test]
    fn test_quantum_override() {
        let overrides = AlgorithmOverrides {
            quantum: Some(3),
            ..AlgorithmOverrides::default()
        };
        let scenario = overrides.apply(rr_scenario());
        assert_eq!(scenario.params.quantum, Some(3));
        assert_eq!(scenario.algorithm, AlgorithmKind::RoundRobin);
    }

    #[test]
    fn test_switch_to_mlfq() {
        let overrides = AlgorithmOverrides {
            algorithm: Some(AlgorithmKind::Mlfq),
            quantums: Some(vec![1, 2, 4]),
            allotment: Some(20),
            ..AlgorithmOverrides::default()
        };
        let scenario = overrides.apply(rr_scenario());
        assert_eq!(scenario.algorithm, AlgorithmKind::Mlfq);
        assert_eq!(scenario.params.queues, Some(3));
        assert_eq!(scenario.params.quantums, Some(vec![1, 2, 4]));
        assert_eq!(scenario.params.allotment, Some(20));
        // Unrelated file values survive
        assert_eq!(scenario.params.quantum, Some(2));
    }

    #[test]
    fn test_default_config() {
        let config = HostConfig::new("scenario.json");
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.simulation_config(), SimulationConfig::default());
        assert!(!config.explain);
    }
}
