//! Final per-process timings and aggregate metrics

use crate::pcb::{PcbTable, ProcessRecord};
use crate::trace::{ExecutionTrace, TimelineSegment};
use sched_types::{AlgorithmKind, Pid};
use serde::{Deserialize, Serialize};

/// Timings of one finished process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival_time: u64,
    pub burst_time: u64,
    /// First dispatch tick
    pub scheduled_time: u64,
    pub waiting_time: u64,
    pub turnaround_time: u64,
    pub completion_time: u64,
    /// `scheduled - arrival`
    pub response_time: u64,
}

impl ProcessMetrics {
    /// Metrics of a DONE record; `None` while the process is unfinished
    pub fn from_record(record: &ProcessRecord) -> Option<Self> {
        Some(Self {
            pid: record.pid(),
            arrival_time: record.arrival_time(),
            burst_time: record.burst_time(),
            scheduled_time: record.scheduled_time()?,
            waiting_time: record.waiting_time()?,
            turnaround_time: record.turnaround_time()?,
            completion_time: record.completion_time()?,
            response_time: record.response_time()?,
        })
    }
}

/// Run-wide averages and utilization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    /// Σ burst / makespan × 100
    pub cpu_utilization: f64,
    /// Processes completed per tick
    pub throughput: f64,
    /// Tick at which the last process completed
    pub makespan: u64,
}

impl AggregateMetrics {
    pub fn from_processes(processes: &[ProcessMetrics]) -> Self {
        let count = processes.len() as f64;
        let average = |value: fn(&ProcessMetrics) -> u64| {
            if processes.is_empty() {
                0.0
            } else {
                processes.iter().map(value).sum::<u64>() as f64 / count
            }
        };

        let makespan = processes
            .iter()
            .map(|process| process.completion_time)
            .max()
            .unwrap_or(0);
        let total_burst: u64 = processes.iter().map(|process| process.burst_time).sum();
        let (cpu_utilization, throughput) = if makespan == 0 {
            (0.0, 0.0)
        } else {
            (
                total_burst as f64 / makespan as f64 * 100.0,
                count / makespan as f64,
            )
        };

        Self {
            average_waiting_time: average(|process| process.waiting_time),
            average_turnaround_time: average(|process| process.turnaround_time),
            average_response_time: average(|process| process.response_time),
            cpu_utilization,
            throughput,
            makespan,
        }
    }
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub algorithm: AlgorithmKind,
    pub processes: Vec<ProcessMetrics>,
    pub summary: AggregateMetrics,
    pub timeline: Vec<TimelineSegment>,
    pub trace: ExecutionTrace,
}

impl SimulationReport {
    /// Derives the report from a finished table and its trace
    ///
    /// The trace of a finished run ends with the tick that retires the last
    /// process. That tick lies past the makespan and is left out of the
    /// timeline.
    pub(crate) fn build(algorithm: AlgorithmKind, table: &PcbTable, trace: ExecutionTrace) -> Self {
        let processes: Vec<ProcessMetrics> = table
            .records()
            .iter()
            .filter_map(ProcessMetrics::from_record)
            .collect();
        let summary = AggregateMetrics::from_processes(&processes);
        let timeline = if table.is_all_finished() {
            trace.timeline_until(summary.makespan)
        } else {
            trace.timeline()
        };
        Self {
            algorithm,
            summary,
            timeline,
            processes,
            trace,
        }
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|process| process.pid == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(raw: u32, arrival: u64, burst: u64, scheduled: u64, completion: u64) -> ProcessMetrics {
        let turnaround = completion - arrival;
        ProcessMetrics {
            pid: Pid::new(raw).unwrap(),
            arrival_time: arrival,
            burst_time: burst,
            scheduled_time: scheduled,
            waiting_time: turnaround - burst,
            turnaround_time: turnaround,
            completion_time: completion,
            response_time: scheduled - arrival,
        }
    }

    #[test]
    fn test_fcfs_textbook_aggregates() {
        let processes = [
            metrics(1, 0, 5, 0, 5),
            metrics(2, 1, 3, 5, 8),
            metrics(3, 2, 2, 8, 10),
        ];
        let summary = AggregateMetrics::from_processes(&processes);

        assert!((summary.average_waiting_time - 10.0 / 3.0).abs() < 1e-9);
        assert!((summary.average_turnaround_time - 20.0 / 3.0).abs() < 1e-9);
        assert!((summary.average_response_time - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.makespan, 10);
        assert!((summary.cpu_utilization - 100.0).abs() < 1e-9);
        assert!((summary.throughput - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_idle_time_lowers_utilization() {
        let processes = [metrics(1, 0, 2, 0, 2), metrics(2, 6, 2, 6, 8)];
        let summary = AggregateMetrics::from_processes(&processes);
        assert_eq!(summary.makespan, 8);
        assert!((summary.cpu_utilization - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_zeroes() {
        let summary = AggregateMetrics::from_processes(&[]);
        assert_eq!(summary.makespan, 0);
        assert_eq!(summary.throughput, 0.0);
        assert_eq!(summary.average_waiting_time, 0.0);
    }
}
