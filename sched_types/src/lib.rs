//! # Scheduling Types
//!
//! This crate defines the input types shared by the scheduling engine and
//! the programs that drive it.
//!
//! ## Philosophy
//!
//! - **Raw in, typed out**: Callers describe scenarios with plain, signed
//!   numbers. The engine validates them and builds its own typed state.
//! - **Serializable**: Every type round-trips through JSON unchanged.
//!
//! ## Key Types
//!
//! - [`Pid`]: Identifier of a simulated process
//! - [`ProcessSpec`]: Arrival, burst and I/O profile of one process
//! - [`AlgorithmKind`]: Which scheduling policy to run
//! - [`AlgorithmParams`]: Raw quantum / queue / allotment parameters
//! - [`Scenario`]: Processes plus algorithm, the unit of one simulation request

pub mod algorithm;
pub mod ids;
pub mod scenario;

pub use algorithm::{AlgorithmKind, AlgorithmParams, UnknownAlgorithm};
pub use ids::{InvalidPid, Pid};
pub use scenario::{IoSpec, ProcessSpec, Scenario};
