//! # Host Runtime
//!
//! Loads a scenario, runs it and renders the report.

use crate::config::{HostConfig, OutputFormat};
use crate::render::{render_json, render_text};
use log::{debug, info};
use sched_engine::{SimulationDriver, SimulationError, SimulationReport};
use sched_types::Scenario;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read scenario {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scenario {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Failed to encode report: {0}")]
    Encode(#[source] serde_json::Error),
}

impl HostError {
    /// Process exit status: 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            HostError::Io { .. } | HostError::Parse { .. } => 2,
            HostError::Simulation(err) if err.is_user_error() => 2,
            HostError::Simulation(_) | HostError::Encode(_) => 1,
        }
    }
}

/// One simulation run driven from a [`HostConfig`]
pub struct HostRuntime {
    config: HostConfig,
}

impl HostRuntime {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Reads the scenario file and applies command-line overrides
    pub fn load_scenario(&self) -> Result<Scenario, HostError> {
        let path = &self.config.scenario_path;
        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.clone(),
            source,
        })?;
        let scenario: Scenario =
            serde_json::from_str(&text).map_err(|source| HostError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(
            "Loaded {} processes from {}",
            scenario.processes.len(),
            path.display()
        );

        if !self.config.overrides.is_empty() {
            debug!("Applying overrides: {:?}", self.config.overrides);
        }
        Ok(self.config.overrides.apply(scenario))
    }

    /// Runs the scenario to completion
    pub fn simulate(&self) -> Result<SimulationReport, HostError> {
        let scenario = self.load_scenario()?;
        let driver = SimulationDriver::new(&scenario, self.config.simulation_config())?;
        let report = driver.run()?;
        info!(
            "{}: {} processes, makespan {}",
            report.algorithm,
            report.processes.len(),
            report.summary.makespan
        );
        Ok(report)
    }

    /// Runs the scenario and renders the report in the configured format
    pub fn run(&self) -> Result<String, HostError> {
        let report = self.simulate()?;
        match self.config.format {
            OutputFormat::Json => render_json(&report).map_err(HostError::Encode),
            OutputFormat::Text => Ok(render_text(&report, self.config.explain)),
        }
    }
}
