//! Test utilities
//!
//! Helpers for building scenarios and reading traces in tests. They are
//! public so integration tests and downstream crates can share them.

use crate::trace::{EventKind, ExecutionTrace};
use sched_types::{AlgorithmKind, AlgorithmParams, Pid, ProcessSpec, Scenario};
use std::collections::HashMap;

/// CPU-only processes from `(arrival, burst)` pairs
pub fn processes(profile: &[(i64, i64)]) -> Vec<ProcessSpec> {
    profile
        .iter()
        .map(|&(arrival, burst)| ProcessSpec::new(arrival, burst))
        .collect()
}

/// Scenario from `(arrival, burst)` pairs
pub fn scenario(
    algorithm: AlgorithmKind,
    params: AlgorithmParams,
    profile: &[(i64, i64)],
) -> Scenario {
    Scenario::new(processes(profile), algorithm).with_params(params)
}

/// The three-process workload used throughout the reference traces:
/// arrivals 0, 1, 2 with bursts 5, 3, 2
pub fn textbook_processes() -> Vec<ProcessSpec> {
    processes(&[(0, 5), (1, 3), (2, 2)])
}

/// CPU owner per tick as raw pid numbers, 0 meaning idle
pub fn running_pids(trace: &ExecutionTrace) -> Vec<u32> {
    trace
        .running_sequence()
        .into_iter()
        .map(|pid| pid.map(|pid| pid.get()).unwrap_or(0))
        .collect()
}

/// CPU ticks consumed by each dispatch, in dispatch order
///
/// A dispatch's run ends when the process leaves the CPU for any reason.
pub fn ticks_per_dispatch(trace: &ExecutionTrace) -> Vec<(Pid, u64)> {
    let mut runs: Vec<(Pid, u64)> = Vec::new();
    let mut open: HashMap<Pid, usize> = HashMap::new();

    for entry in trace.entries() {
        for event in &entry.events {
            if let EventKind::Dispatched { pid, .. } = event.kind {
                open.insert(pid, runs.len());
                runs.push((pid, 0));
            }
        }
        if let Some(pid) = entry.running_pid {
            if let Some(&index) = open.get(&pid) {
                runs[index].1 += 1;
            }
        }
    }
    runs
}

/// Remaining burst of every process at the end of each tick
///
/// `bursts[i]` is the burst of pid `i + 1`.
pub fn remaining_after_each_tick(trace: &ExecutionTrace, bursts: &[u64]) -> Vec<Vec<u64>> {
    let mut remaining = bursts.to_vec();
    trace
        .entries()
        .iter()
        .map(|entry| {
            if let Some(pid) = entry.running_pid {
                remaining[pid.index()] -= 1;
            }
            remaining.clone()
        })
        .collect()
}
