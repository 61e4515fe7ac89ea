//! # Process Control Block Table
//!
//! Canonical per-process state for one run.
//!
//! Records are created by [`PcbTable::register_processes`] before the run
//! starts and afterwards change only through the table's mutators. A record
//! that reaches [`ProcessState::Done`] is frozen: every mutator ignores it.
//!
//! ## State machine
//!
//! ```text
//! NEW ──► READY ──► RUNNING ──► DONE
//!           ▲          │
//!           ├──────────┤ (preempted)
//!           │          ▼
//!           └─── WAITING_IO
//! ```

use crate::error::ValidationError;
use log::debug;
use sched_types::{Pid, ProcessSpec};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a simulated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Registered, not yet arrived
    New,
    /// Queued and eligible for dispatch
    Ready,
    /// Holding the CPU
    Running,
    /// Blocked inside an I/O window
    WaitingIo,
    /// Burst fully consumed
    Done,
}

impl ProcessState {
    /// Checks an edge of the process state machine
    pub fn can_transition_to(&self, next: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, next),
            (New, Ready)
                | (Ready, Running)
                | (Running, Ready)
                | (Running, WaitingIo)
                | (Running, Done)
                | (WaitingIo, Ready)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Done)
    }
}

/// A validated I/O interval, measured in CPU progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoWindow {
    /// CPU ticks consumed when the process blocks
    pub start: u64,
    /// Ticks spent blocked
    pub duration: u64,
}

/// Per-process control block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pid: Pid,
    arrival_time: u64,
    burst_time: u64,
    io_windows: Vec<IoWindow>,
    cpu_time_consumed: u64,
    state: ProcessState,
    priority_level: usize,
    quantum_remaining: Option<u64>,
    scheduled_time: Option<u64>,
    completion_time: Option<u64>,
    /// Index of the first I/O window not yet completed
    next_io: usize,
    /// Ticks left in the active I/O window, meaningful while WAITING_IO
    io_remaining: u64,
}

impl ProcessRecord {
    fn from_spec(index: usize, spec: &ProcessSpec, pid: Pid) -> Result<Self, ValidationError> {
        if spec.arrival_time < 0 {
            return Err(ValidationError::NegativeArrival {
                index,
                arrival_time: spec.arrival_time,
            });
        }
        if spec.burst_time <= 0 {
            return Err(ValidationError::NonPositiveBurst {
                index,
                burst_time: spec.burst_time,
            });
        }

        let mut io_windows = Vec::with_capacity(spec.io.len());
        let mut previous: Option<i64> = None;
        for io in &spec.io {
            if io.start < 0 || io.start >= spec.burst_time {
                return Err(ValidationError::IoStartOutOfRange {
                    index,
                    start: io.start,
                    burst_time: spec.burst_time,
                });
            }
            if io.duration <= 0 {
                return Err(ValidationError::NonPositiveIoDuration {
                    index,
                    start: io.start,
                    duration: io.duration,
                });
            }
            if let Some(previous) = previous {
                if io.start <= previous {
                    return Err(ValidationError::IoWindowsOutOfOrder {
                        index,
                        start: io.start,
                        previous,
                    });
                }
            }
            previous = Some(io.start);
            io_windows.push(IoWindow {
                start: io.start as u64,
                duration: io.duration as u64,
            });
        }

        Ok(Self {
            pid,
            arrival_time: spec.arrival_time as u64,
            burst_time: spec.burst_time as u64,
            io_windows,
            cpu_time_consumed: 0,
            state: ProcessState::New,
            priority_level: 0,
            quantum_remaining: None,
            scheduled_time: None,
            completion_time: None,
            next_io: 0,
            io_remaining: 0,
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    pub fn io_windows(&self) -> &[IoWindow] {
        &self.io_windows
    }

    pub fn cpu_time_consumed(&self) -> u64 {
        self.cpu_time_consumed
    }

    /// CPU ticks still needed to finish
    pub fn remaining_burst(&self) -> u64 {
        self.burst_time - self.cpu_time_consumed
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Ready-queue level; 0 is the highest priority
    pub fn priority_level(&self) -> usize {
        self.priority_level
    }

    /// Ticks left in the current quantum; `None` means unbounded
    pub fn quantum_remaining(&self) -> Option<u64> {
        self.quantum_remaining
    }

    /// Tick of the first dispatch
    pub fn scheduled_time(&self) -> Option<u64> {
        self.scheduled_time
    }

    pub fn completion_time(&self) -> Option<u64> {
        self.completion_time
    }

    /// `completion - arrival`, once the process is done
    pub fn turnaround_time(&self) -> Option<u64> {
        self.completion_time
            .map(|completion| completion - self.arrival_time)
    }

    /// `turnaround - burst`, once the process is done
    pub fn waiting_time(&self) -> Option<u64> {
        self.turnaround_time()
            .map(|turnaround| turnaround - self.burst_time)
    }

    /// `first dispatch - arrival`, once the process has been dispatched
    pub fn response_time(&self) -> Option<u64> {
        self.scheduled_time
            .map(|scheduled| scheduled - self.arrival_time)
    }

    /// Ticks left in the active I/O window
    pub fn io_remaining(&self) -> u64 {
        self.io_remaining
    }

    /// The I/O window that begins at the current CPU progress, if any
    fn pending_io(&self) -> Option<IoWindow> {
        self.io_windows
            .get(self.next_io)
            .copied()
            .filter(|window| window.start == self.cpu_time_consumed)
    }
}

/// Table of every process in a run, indexed by pid
#[derive(Debug, Clone, Default)]
pub struct PcbTable {
    records: Vec<ProcessRecord>,
}

impl PcbTable {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Validates `specs` and appends one record per spec
    ///
    /// Pids continue the table's sequence, starting at 1 for an empty
    /// table. On error nothing is added.
    pub fn register_processes(&mut self, specs: &[ProcessSpec]) -> Result<Vec<Pid>, ValidationError> {
        if specs.is_empty() {
            return Err(ValidationError::NoProcesses);
        }

        let base = self.records.len();
        let staged = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| ProcessRecord::from_spec(index, spec, Pid::from_index(base + index)))
            .collect::<Result<Vec<_>, _>>()?;

        let pids = staged.iter().map(|record| record.pid).collect();
        self.records.extend(staged);
        Ok(pids)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in pid order
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn get_record(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.records.get(pid.index())
    }

    /// Mutable access to a live record; frozen (DONE) records are skipped
    fn live_mut(&mut self, pid: Pid) -> Option<&mut ProcessRecord> {
        self.records
            .get_mut(pid.index())
            .filter(|record| !record.state.is_terminal())
    }

    /// True if some NEW process has arrived by `tick`
    pub fn has_next_arrival(&self, tick: u64) -> bool {
        self.next_arrival(tick).is_some()
    }

    /// Earliest-arriving NEW process with `arrival <= tick`, ties by pid
    ///
    /// Does not change the process state.
    pub fn next_arrival(&self, tick: u64) -> Option<Pid> {
        self.records
            .iter()
            .filter(|record| record.state == ProcessState::New && record.arrival_time <= tick)
            .min_by_key(|record| (record.arrival_time, record.pid))
            .map(|record| record.pid)
    }

    pub fn set_state(&mut self, pid: Pid, state: ProcessState) {
        if let Some(record) = self.live_mut(pid) {
            debug_assert!(
                record.state.can_transition_to(state),
                "illegal transition {:?} -> {:?} for {}",
                record.state,
                state,
                pid
            );
            debug!("{}: {:?} -> {:?}", pid, record.state, state);
            record.state = state;
        }
    }

    pub fn set_priority(&mut self, pid: Pid, level: usize) {
        if let Some(record) = self.live_mut(pid) {
            record.priority_level = level;
        }
    }

    /// Consumes one tick of CPU burst
    pub fn tick_cpu_time(&mut self, pid: Pid) {
        if let Some(record) = self.live_mut(pid) {
            if record.cpu_time_consumed < record.burst_time {
                record.cpu_time_consumed += 1;
            }
        }
    }

    /// Consumes one tick of a finite quantum
    pub fn tick_quantum(&mut self, pid: Pid) {
        if let Some(record) = self.live_mut(pid) {
            if let Some(quantum) = record.quantum_remaining.as_mut() {
                *quantum = quantum.saturating_sub(1);
            }
        }
    }

    /// Records the first dispatch tick
    ///
    /// Returns false, leaving the record unchanged, if the process was
    /// already dispatched before.
    pub fn set_scheduled_time(&mut self, pid: Pid, tick: u64) -> bool {
        match self.live_mut(pid) {
            Some(record) if record.scheduled_time.is_none() => {
                record.scheduled_time = Some(tick);
                true
            }
            _ => false,
        }
    }

    pub fn set_quantum_left(&mut self, pid: Pid, quantum: Option<u64>) {
        if let Some(record) = self.live_mut(pid) {
            record.quantum_remaining = quantum;
        }
    }

    /// Marks a process DONE at `tick`
    pub fn complete(&mut self, pid: Pid, tick: u64) {
        if let Some(record) = self.live_mut(pid) {
            record.completion_time = Some(tick);
            record.quantum_remaining = None;
        }
        self.set_state(pid, ProcessState::Done);
    }

    /// True once the whole burst has been consumed
    pub fn is_process_finished(&self, pid: Pid) -> bool {
        self.get_record(pid)
            .map(|record| record.cpu_time_consumed == record.burst_time)
            .unwrap_or(false)
    }

    /// True once the table is non-empty and every record is DONE
    pub fn is_all_finished(&self) -> bool {
        !self.records.is_empty()
            && self
                .records
                .iter()
                .all(|record| record.state == ProcessState::Done)
    }

    /// Latest tick by which every process can have completed
    ///
    /// Last arrival plus all CPU and I/O time. Once every process has
    /// arrived the CPU only idles while some process is blocked, so no
    /// schedule that dispatches whenever work is ready ends later.
    pub fn completion_bound(&self) -> u64 {
        let last_arrival = self
            .records
            .iter()
            .map(|record| record.arrival_time)
            .max()
            .unwrap_or(0);
        self.records.iter().fold(last_arrival, |bound, record| {
            let io: u64 = record.io_windows.iter().map(|window| window.duration).sum();
            bound.saturating_add(record.burst_time).saturating_add(io)
        })
    }

    /// Duration of the I/O window starting at the process's current CPU
    /// progress, if one is due
    pub fn io_due(&self, pid: Pid) -> Option<u64> {
        self.get_record(pid)
            .and_then(ProcessRecord::pending_io)
            .map(|window| window.duration)
    }

    /// Moves a running process into its due I/O window
    ///
    /// Returns the window duration, or `None` if no window is due.
    pub fn start_io(&mut self, pid: Pid) -> Option<u64> {
        let duration = self.io_due(pid)?;
        if let Some(record) = self.live_mut(pid) {
            record.io_remaining = duration;
        }
        self.set_state(pid, ProcessState::WaitingIo);
        Some(duration)
    }

    /// Advances every WAITING_IO process by one tick
    ///
    /// Returns, in increasing pid order, the processes whose window just
    /// completed. Their state is left as WAITING_IO; the caller moves them
    /// back to READY.
    pub fn handle_io_tick(&mut self) -> Vec<Pid> {
        let mut completed = Vec::new();
        for record in self
            .records
            .iter_mut()
            .filter(|record| record.state == ProcessState::WaitingIo)
        {
            record.io_remaining = record.io_remaining.saturating_sub(1);
            if record.io_remaining == 0 {
                record.next_io += 1;
                completed.push(record.pid);
            }
        }
        completed
    }

    /// Processes currently blocked on I/O, in pid order
    pub fn waiting_pids(&self) -> Vec<Pid> {
        self.records
            .iter()
            .filter(|record| record.state == ProcessState::WaitingIo)
            .map(|record| record.pid)
            .collect()
    }

    /// Resets every live process above level 0 back to level 0
    pub fn reset_priorities(&mut self) {
        for record in self
            .records
            .iter_mut()
            .filter(|record| !record.state.is_terminal())
        {
            record.priority_level = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> Pid {
        Pid::new(raw).unwrap()
    }

    fn table(specs: &[ProcessSpec]) -> PcbTable {
        let mut table = PcbTable::new();
        table.register_processes(specs).unwrap();
        table
    }

    #[test]
    fn test_register_assigns_sequential_pids() {
        let mut table = PcbTable::new();
        let pids = table
            .register_processes(&[ProcessSpec::new(0, 5), ProcessSpec::new(2, 3)])
            .unwrap();
        assert_eq!(pids, vec![pid(1), pid(2)]);

        let more = table.register_processes(&[ProcessSpec::new(4, 1)]).unwrap();
        assert_eq!(more, vec![pid(3)]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_register_rejects_without_partial_state() {
        let mut table = PcbTable::new();
        let err = table
            .register_processes(&[ProcessSpec::new(0, 5), ProcessSpec::new(1, 0)])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonPositiveBurst {
                index: 1,
                burst_time: 0
            }
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_register_rejects_empty_list() {
        let mut table = PcbTable::new();
        assert_eq!(
            table.register_processes(&[]),
            Err(ValidationError::NoProcesses)
        );
    }

    #[test]
    fn test_register_validates_arrival_and_io() {
        let mut table = PcbTable::new();
        assert_eq!(
            table.register_processes(&[ProcessSpec::new(-1, 3)]),
            Err(ValidationError::NegativeArrival {
                index: 0,
                arrival_time: -1
            })
        );
        assert_eq!(
            table.register_processes(&[ProcessSpec::new(0, 3).with_io(3, 1)]),
            Err(ValidationError::IoStartOutOfRange {
                index: 0,
                start: 3,
                burst_time: 3
            })
        );
        assert_eq!(
            table.register_processes(&[ProcessSpec::new(0, 3).with_io(1, 0)]),
            Err(ValidationError::NonPositiveIoDuration {
                index: 0,
                start: 1,
                duration: 0
            })
        );
        assert_eq!(
            table.register_processes(&[ProcessSpec::new(0, 5).with_io(2, 1).with_io(2, 1)]),
            Err(ValidationError::IoWindowsOutOfOrder {
                index: 0,
                start: 2,
                previous: 2
            })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_next_arrival_breaks_ties_by_pid() {
        let table = table(&[
            ProcessSpec::new(3, 1),
            ProcessSpec::new(1, 1),
            ProcessSpec::new(1, 1),
        ]);
        assert!(!table.has_next_arrival(0));
        assert_eq!(table.next_arrival(1), Some(pid(2)));
        assert_eq!(table.next_arrival(10), Some(pid(2)));
    }

    #[test]
    fn test_next_arrival_skips_admitted_processes() {
        let mut table = table(&[ProcessSpec::new(0, 1), ProcessSpec::new(0, 1)]);
        table.set_state(pid(1), ProcessState::Ready);
        assert_eq!(table.next_arrival(0), Some(pid(2)));
    }

    #[test]
    fn test_cpu_and_quantum_ticks() {
        let mut table = table(&[ProcessSpec::new(0, 2)]);
        table.set_state(pid(1), ProcessState::Ready);
        table.set_state(pid(1), ProcessState::Running);
        table.set_quantum_left(pid(1), Some(1));

        table.tick_cpu_time(pid(1));
        table.tick_quantum(pid(1));
        let record = table.get_record(pid(1)).unwrap();
        assert_eq!(record.cpu_time_consumed(), 1);
        assert_eq!(record.quantum_remaining(), Some(0));
        assert!(!table.is_process_finished(pid(1)));

        table.tick_cpu_time(pid(1));
        assert!(table.is_process_finished(pid(1)));
    }

    #[test]
    fn test_unbounded_quantum_never_decrements() {
        let mut table = table(&[ProcessSpec::new(0, 2)]);
        table.set_quantum_left(pid(1), None);
        table.tick_quantum(pid(1));
        assert_eq!(table.get_record(pid(1)).unwrap().quantum_remaining(), None);
    }

    #[test]
    fn test_scheduled_time_is_set_once() {
        let mut table = table(&[ProcessSpec::new(0, 2)]);
        assert!(table.set_scheduled_time(pid(1), 4));
        assert!(!table.set_scheduled_time(pid(1), 9));
        assert_eq!(table.get_record(pid(1)).unwrap().scheduled_time(), Some(4));
    }

    #[test]
    fn test_done_records_are_frozen() {
        let mut table = table(&[ProcessSpec::new(1, 1)]);
        table.set_state(pid(1), ProcessState::Ready);
        table.set_state(pid(1), ProcessState::Running);
        table.tick_cpu_time(pid(1));
        table.complete(pid(1), 3);

        table.set_priority(pid(1), 2);
        table.tick_cpu_time(pid(1));

        let record = table.get_record(pid(1)).unwrap();
        assert_eq!(record.state(), ProcessState::Done);
        assert_eq!(record.priority_level(), 0);
        assert_eq!(record.completion_time(), Some(3));
        assert_eq!(record.turnaround_time(), Some(2));
        assert_eq!(record.waiting_time(), Some(1));
        assert!(table.is_all_finished());
    }

    #[test]
    fn test_is_all_finished_requires_records() {
        assert!(!PcbTable::new().is_all_finished());
    }

    #[test]
    fn test_completion_bound_covers_arrival_cpu_and_io() {
        let table = table(&[
            ProcessSpec::new(0, 4).with_io(2, 3),
            ProcessSpec::new(150_000, 1),
        ]);
        assert_eq!(table.completion_bound(), 150_000 + 4 + 1 + 3);
        assert_eq!(PcbTable::new().completion_bound(), 0);
    }

    #[test]
    fn test_io_window_lifecycle() {
        let mut table = table(&[ProcessSpec::new(0, 3).with_io(1, 2)]);
        table.set_state(pid(1), ProcessState::Ready);
        table.set_state(pid(1), ProcessState::Running);
        assert_eq!(table.io_due(pid(1)), None);

        table.tick_cpu_time(pid(1));
        assert_eq!(table.io_due(pid(1)), Some(2));
        assert_eq!(table.start_io(pid(1)), Some(2));
        assert_eq!(table.waiting_pids(), vec![pid(1)]);

        assert!(table.handle_io_tick().is_empty());
        assert_eq!(table.handle_io_tick(), vec![pid(1)]);

        table.set_state(pid(1), ProcessState::Ready);
        assert_eq!(table.io_due(pid(1)), None);
        assert!(table.waiting_pids().is_empty());
    }

    #[test]
    fn test_io_completions_in_pid_order() {
        let mut table = table(&[
            ProcessSpec::new(0, 2).with_io(0, 1),
            ProcessSpec::new(0, 2).with_io(0, 1),
        ]);
        for raw in [2, 1] {
            table.set_state(pid(raw), ProcessState::Ready);
            table.set_state(pid(raw), ProcessState::Running);
            table.start_io(pid(raw));
        }
        assert_eq!(table.handle_io_tick(), vec![pid(1), pid(2)]);
    }

    #[test]
    fn test_state_graph() {
        use ProcessState::*;
        assert!(New.can_transition_to(Ready));
        assert!(Running.can_transition_to(WaitingIo));
        assert!(WaitingIo.can_transition_to(Ready));
        assert!(!New.can_transition_to(Running));
        assert!(!Done.can_transition_to(Ready));
        assert!(!WaitingIo.can_transition_to(Running));
    }

    #[test]
    fn test_reset_priorities() {
        let mut table = table(&[ProcessSpec::new(0, 2), ProcessSpec::new(0, 2)]);
        table.set_priority(pid(1), 2);
        table.set_priority(pid(2), 1);
        table.reset_priorities();
        assert!(table.records().iter().all(|r| r.priority_level() == 0));
    }
}
