//! # Scheduling Simulator Host
//!
//! This crate provides the host side of the scheduling simulator: it reads
//! a scenario file, runs the engine and renders the result.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The engine never touches files or stdout
//! - **Output is rendering**: JSON for tools, text for people
//! - **Command line wins**: Algorithm options override the scenario file
//!
//! ## Responsibilities
//!
//! The host:
//! - Loads and parses scenario JSON
//! - Applies command-line algorithm overrides
//! - Runs one simulation with a configurable tick ceiling
//! - Renders the report as JSON or as a Gantt chart with tables
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Validate scenarios itself (the engine does)
//! - Keep state between runs

pub mod config;
pub mod render;
pub mod runtime;

pub use config::{AlgorithmOverrides, HostConfig, OutputFormat};
pub use render::{render_json, render_text};
pub use runtime::{HostError, HostRuntime};
