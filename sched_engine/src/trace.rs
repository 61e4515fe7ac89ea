//! # Execution Trace
//!
//! Append-only, tick-by-tick record of a run.
//!
//! Each tick produces one [`TraceEntry`]: which process held the CPU, the
//! transitions that happened, and a snapshot of the ready queues, the I/O
//! wait set and the tick's arrivals. Every transition is a [`TraceEvent`]
//! carrying both the numbers a grader needs and a sentence a learner can
//! read.

use crate::pcb::ProcessState;
use sched_types::Pid;
use serde::{Deserialize, Serialize};

/// Why a running process lost the CPU early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreemptCause {
    /// A newly arrived process takes precedence
    Arrival,
    /// A process returning from I/O takes precedence
    IoReturn,
    /// A ready process needs strictly less CPU time
    ShorterRemaining,
}

/// A single state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum EventKind {
    /// NEW -> READY
    Arrived { pid: Pid, level: usize },
    /// READY -> RUNNING
    Dispatched {
        pid: Pid,
        level: usize,
        /// `None` for an unbounded quantum
        quantum: Option<u64>,
        first_dispatch: bool,
    },
    /// RUNNING -> READY after the quantum ran out
    QuantumExpired {
        pid: Pid,
        from_level: usize,
        to_level: usize,
    },
    /// RUNNING -> READY because another process takes precedence
    Preempted {
        pid: Pid,
        level: usize,
        cause: PreemptCause,
        by: Pid,
    },
    /// RUNNING -> WAITING_IO
    IoStarted { pid: Pid, duration: u64 },
    /// WAITING_IO -> READY
    IoCompleted { pid: Pid, level: usize },
    /// RUNNING -> DONE
    Completed {
        pid: Pid,
        turnaround_time: u64,
        waiting_time: u64,
    },
    /// MLFQ priority boost
    PriorityBoost {
        /// Queued processes moved to level 0, in order
        boosted: Vec<Pid>,
        /// Process taken off the CPU by the boost
        preempted: Option<Pid>,
    },
}

impl EventKind {
    /// Process whose state changed, when the event concerns exactly one
    pub fn pid(&self) -> Option<Pid> {
        match self {
            EventKind::Arrived { pid, .. }
            | EventKind::Dispatched { pid, .. }
            | EventKind::QuantumExpired { pid, .. }
            | EventKind::Preempted { pid, .. }
            | EventKind::IoStarted { pid, .. }
            | EventKind::IoCompleted { pid, .. }
            | EventKind::Completed { pid, .. } => Some(*pid),
            EventKind::PriorityBoost { .. } => None,
        }
    }

    /// State the affected process ends up in
    pub fn resulting_state(&self) -> Option<ProcessState> {
        match self {
            EventKind::Arrived { .. }
            | EventKind::QuantumExpired { .. }
            | EventKind::Preempted { .. }
            | EventKind::IoCompleted { .. } => Some(ProcessState::Ready),
            EventKind::Dispatched { .. } => Some(ProcessState::Running),
            EventKind::IoStarted { .. } => Some(ProcessState::WaitingIo),
            EventKind::Completed { .. } => Some(ProcessState::Done),
            EventKind::PriorityBoost { .. } => None,
        }
    }

    /// Human-readable justification of the transition
    pub fn describe(&self) -> String {
        match self {
            EventKind::Arrived { pid, level } => {
                format!("{} arrived and joined ready queue {}", pid, level)
            }
            EventKind::Dispatched {
                pid,
                level,
                quantum,
                first_dispatch,
            } => {
                let mut text = format!("{} was dispatched from queue {}", pid, level);
                match quantum {
                    Some(quantum) => {
                        text.push_str(&format!(" with a quantum of {} ticks", quantum));
                    }
                    None => text.push_str(" and may run until it finishes or blocks"),
                }
                if *first_dispatch {
                    text.push_str(" (first time on the CPU)");
                }
                text
            }
            EventKind::QuantumExpired {
                pid,
                from_level,
                to_level,
            } => {
                if from_level == to_level {
                    format!(
                        "{} used up its quantum and moved to the back of queue {}",
                        pid, to_level
                    )
                } else {
                    format!(
                        "{} used up its quantum in queue {} and was demoted to queue {}",
                        pid, from_level, to_level
                    )
                }
            }
            EventKind::Preempted {
                pid,
                level,
                cause,
                by,
            } => {
                let reason = match cause {
                    PreemptCause::Arrival => format!("{} arrived and takes precedence", by),
                    PreemptCause::IoReturn => {
                        format!("{} returned from I/O and takes precedence", by)
                    }
                    PreemptCause::ShorterRemaining => {
                        format!("{} needs less time to finish", by)
                    }
                };
                format!("{} was preempted because {}; it rejoined queue {}", pid, reason, level)
            }
            EventKind::IoStarted { pid, duration } => {
                format!("{} started I/O for {} ticks and released the CPU", pid, duration)
            }
            EventKind::IoCompleted { pid, level } => {
                format!("{} finished I/O and rejoined ready queue {}", pid, level)
            }
            EventKind::Completed {
                pid,
                turnaround_time,
                waiting_time,
            } => format!(
                "{} finished (turnaround {}, waiting {})",
                pid, turnaround_time, waiting_time
            ),
            EventKind::PriorityBoost { boosted, preempted } => {
                let mut moved: Vec<String> = boosted.iter().map(Pid::to_string).collect();
                if let Some(pid) = preempted {
                    moved.push(format!("{} (preempted)", pid));
                }
                if moved.is_empty() {
                    "Priority boost: every process is already in queue 0".to_string()
                } else {
                    format!("Priority boost: {} moved to queue 0", moved.join(", "))
                }
            }
        }
    }
}

/// A transition plus its explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub kind: EventKind,
    pub message: String,
}

impl TraceEvent {
    pub fn new(kind: EventKind) -> Self {
        let message = kind.describe();
        Self { kind, message }
    }
}

/// Snapshot of one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    pub tick: u64,
    /// Process that consumed CPU during this tick; `None` when idle
    pub running_pid: Option<Pid>,
    pub events: Vec<TraceEvent>,
    /// Ready queues at the end of the tick, level 0 first
    pub ready_queues: Vec<Vec<Pid>>,
    /// Processes blocked on I/O at the end of the tick
    pub waiting: Vec<Pid>,
    /// Processes admitted during this tick
    pub new_arrivals: Vec<Pid>,
}

impl TraceEntry {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            running_pid: None,
            events: Vec::new(),
            ready_queues: Vec::new(),
            waiting: Vec::new(),
            new_arrivals: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: EventKind) {
        self.events.push(TraceEvent::new(kind));
    }
}

/// Maximal run of consecutive ticks with the same CPU owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    /// `None` for idle time
    pub pid: Option<Pid>,
    pub start: u64,
    /// Exclusive
    pub end: u64,
}

impl TimelineSegment {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Ordered log of every tick in a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: TraceEntry) {
        debug_assert!(
            self.entries
                .last()
                .map(|last| last.tick < entry.tick)
                .unwrap_or(true),
            "trace ticks must increase"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_at(&self, tick: u64) -> Option<&TraceEntry> {
        self.entries
            .binary_search_by_key(&tick, |entry| entry.tick)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// CPU owner per tick
    pub fn running_sequence(&self) -> Vec<Option<Pid>> {
        self.entries.iter().map(|entry| entry.running_pid).collect()
    }

    /// Every event with the tick it happened in
    pub fn events(&self) -> impl Iterator<Item = (u64, &TraceEvent)> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.events.iter().map(move |event| (entry.tick, event)))
    }

    /// Collapses the per-tick CPU owner into Gantt segments
    pub fn timeline(&self) -> Vec<TimelineSegment> {
        self.timeline_until(u64::MAX)
    }

    /// Like [`timeline`](Self::timeline), ignoring ticks at or after `end`
    pub fn timeline_until(&self, end: u64) -> Vec<TimelineSegment> {
        let mut segments: Vec<TimelineSegment> = Vec::new();
        for entry in self.entries.iter().take_while(|entry| entry.tick < end) {
            match segments.last_mut() {
                Some(last) if last.pid == entry.running_pid && last.end == entry.tick => {
                    last.end = entry.tick + 1;
                }
                _ => segments.push(TimelineSegment {
                    pid: entry.running_pid,
                    start: entry.tick,
                    end: entry.tick + 1,
                }),
            }
        }
        segments
    }
}
