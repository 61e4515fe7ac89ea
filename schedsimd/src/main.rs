//! # Scheduling Simulator
//!
//! Command-line entry point: runs one scenario file and prints the report.

use clap::Parser;
use sched_engine::SimulationConfig;
use sched_types::AlgorithmKind;
use schedsimd::{AlgorithmOverrides, HostConfig, HostRuntime, OutputFormat};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(
    name = "schedsimd",
    version,
    about = "Deterministic CPU scheduling simulator",
    allow_negative_numbers = true
)]
struct Cli {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Minimum tick ceiling, raised to fit the workload
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Scheduling algorithm (FCFS, SJF, STCF, RR, MLFQ)
    #[arg(short, long)]
    algorithm: Option<AlgorithmKind>,

    /// Round robin time quantum
    #[arg(short, long)]
    quantum: Option<i64>,

    /// MLFQ per-level quanta, highest priority first (e.g. 2,4,8)
    #[arg(long, value_delimiter = ',')]
    quantums: Option<Vec<i64>>,

    /// MLFQ priority boost period
    #[arg(long)]
    allotment: Option<i64>,

    /// List every scheduling event with its explanation
    #[arg(short, long)]
    explain: bool,

    /// Log each state transition to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> HostConfig {
        HostConfig {
            scenario_path: self.scenario,
            format: self.format,
            max_ticks: self.max_ticks,
            explain: self.explain,
            overrides: AlgorithmOverrides {
                algorithm: self.algorithm,
                quantum: self.quantum,
                quantums: self.quantums,
                allotment: self.allotment,
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let runtime = HostRuntime::new(cli.into_config());
    match runtime.run() {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
