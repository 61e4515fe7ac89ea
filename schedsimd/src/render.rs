//! Report rendering
//!
//! JSON output is the serialized [`SimulationReport`]. Text output is meant
//! for a terminal: a Gantt chart, one row per process and the summary.

use sched_engine::{SimulationReport, TimelineSegment};
use std::fmt;

/// Width of one Gantt cell, excluding its leading bar
const CELL_WIDTH: usize = 6;

pub fn render_json(report: &SimulationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Renders the human-readable report
///
/// With `explain`, every trace event is listed after the summary with the
/// tick it happened in.
pub fn render_text(report: &SimulationReport, explain: bool) -> String {
    TextReport { report, explain }.to_string()
}

struct TextReport<'a> {
    report: &'a SimulationReport,
    explain: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "Algorithm: {}", report.algorithm)?;
        writeln!(f)?;

        writeln!(f, "Gantt chart")?;
        write!(f, "{}", gantt(&report.timeline))?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<5}{:>8}{:>7}{:>7}{:>12}{:>12}{:>9}{:>10}",
            "PID", "Arrival", "Burst", "Start", "Completion", "Turnaround", "Waiting", "Response"
        )?;
        for process in &report.processes {
            writeln!(
                f,
                "{:<5}{:>8}{:>7}{:>7}{:>12}{:>12}{:>9}{:>10}",
                process.pid.to_string(),
                process.arrival_time,
                process.burst_time,
                process.scheduled_time,
                process.completion_time,
                process.turnaround_time,
                process.waiting_time,
                process.response_time
            )?;
        }
        writeln!(f)?;

        let summary = &report.summary;
        writeln!(f, "Average waiting time:    {:.2}", summary.average_waiting_time)?;
        writeln!(f, "Average turnaround time: {:.2}", summary.average_turnaround_time)?;
        writeln!(f, "Average response time:   {:.2}", summary.average_response_time)?;
        writeln!(f, "CPU utilization:         {:.2}%", summary.cpu_utilization)?;
        writeln!(f, "Throughput:              {:.4} processes/tick", summary.throughput)?;
        writeln!(f, "Makespan:                {} ticks", summary.makespan)?;

        if self.explain {
            writeln!(f)?;
            writeln!(f, "Events")?;
            for (tick, event) in report.trace.events() {
                writeln!(f, "t={:<4} {}", tick, event.message)?;
            }
        }
        Ok(())
    }
}

/// Two lines: labelled cells, then the start tick under each cell
fn gantt(timeline: &[TimelineSegment]) -> String {
    let bars: String = timeline
        .iter()
        .map(|segment| {
            let label = match segment.pid {
                Some(pid) => pid.to_string(),
                None => "idle".to_string(),
            };
            format!("|{:^width$}", label, width = CELL_WIDTH)
        })
        .collect();
    let mut ticks: String = timeline
        .iter()
        .map(|segment| format!("{:<width$}", segment.start, width = CELL_WIDTH + 1))
        .collect();
    if let Some(last) = timeline.last() {
        ticks.push_str(&last.end.to_string());
    }

    format!("{}|\n{}\n", bars, ticks.trim_end())
}
