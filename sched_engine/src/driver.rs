//! # Simulation Driver
//!
//! Runs one scheduling scenario tick by tick.
//!
//! A driver owns every piece of run state: the PCB table, the ready
//! queues, the policy, the clock and the trace. Nothing is shared between
//! drivers, so any number of runs may execute side by side.
//!
//! ## Tick order
//!
//! 1. **Retire**: a running process whose burst is fully consumed becomes
//!    DONE with `completion = tick`, freeing the CPU for this tick.
//! 2. **Admit**: NEW processes with `arrival <= tick` become READY at the
//!    policy's entry level, earliest arrival then lowest pid first. The
//!    policy may preempt the running process for each arrival.
//! 3. **Preemption checks**: an MLFQ boost if one is due, then quantum
//!    expiry, then the policy's per-tick check.
//! 4. **Dispatch**: an idle CPU takes the policy's candidate.
//! 5. **Execute**: the running process either enters a due I/O window or
//!    consumes one tick of burst and quantum.
//! 6. **I/O**: blocked processes advance; completions rejoin the ready
//!    queues and may preempt.
//! 7. **Snapshot** the queues into the trace and advance the clock.

use crate::clock::SimulationClock;
use crate::config::{AlgorithmConfig, SimulationConfig};
use crate::error::SimulationError;
use crate::metrics::SimulationReport;
use crate::pcb::{PcbTable, ProcessState};
use crate::policy::{policy_for, PolicyContext, Requeue, SchedulingPolicy};
use crate::ready_queue::ReadyQueueSet;
use crate::trace::{EventKind, ExecutionTrace, PreemptCause, TraceEntry};
use log::{debug, info, warn};
use sched_types::{AlgorithmKind, Pid, ProcessSpec, Scenario};

/// Deterministic, single-run scheduling simulator
pub struct SimulationDriver {
    algorithm: AlgorithmKind,
    /// Tick at which an unfinished run fails
    ceiling: u64,
    table: PcbTable,
    queues: ReadyQueueSet,
    policy: Box<dyn SchedulingPolicy>,
    clock: SimulationClock,
    trace: ExecutionTrace,
    running: Option<Pid>,
}

impl SimulationDriver {
    /// Validates `scenario` and prepares a run
    ///
    /// Fails with [`SimulationError::Validation`] before any run state
    /// exists.
    pub fn new(scenario: &Scenario, config: SimulationConfig) -> Result<Self, SimulationError> {
        let algorithm = AlgorithmConfig::from_params(scenario.algorithm, &scenario.params)?;
        Self::with_algorithm(&scenario.processes, &algorithm, config)
    }

    /// Prepares a run from already-validated algorithm parameters
    pub fn with_algorithm(
        specs: &[ProcessSpec],
        algorithm: &AlgorithmConfig,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        Self::with_policy(specs, policy_for(algorithm), config)
    }

    /// Prepares a run driven by `policy`
    ///
    /// The tick ceiling is `config.max_ticks`, raised to one past the
    /// workload's [completion bound](PcbTable::completion_bound) when that
    /// is later. Reaching it therefore means the policy stalled, never that
    /// the workload was too long.
    pub fn with_policy(
        specs: &[ProcessSpec],
        policy: Box<dyn SchedulingPolicy>,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        let mut table = PcbTable::new();
        table.register_processes(specs)?;

        let queues = policy.initialize_queues();
        let ceiling = config
            .max_ticks
            .max(table.completion_bound().saturating_add(1));

        info!(
            "Starting {} simulation: {} processes, {} ready queue(s), ceiling {} ticks",
            policy.kind(),
            table.len(),
            queues.level_count(),
            ceiling
        );

        Ok(Self {
            algorithm: policy.kind(),
            ceiling,
            table,
            queues,
            policy,
            clock: SimulationClock::new(),
            trace: ExecutionTrace::new(),
            running: None,
        })
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn table(&self) -> &PcbTable {
        &self.table
    }

    pub fn queues(&self) -> &ReadyQueueSet {
        &self.queues
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    /// Process currently holding the CPU
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.table.is_all_finished()
    }

    /// Effective tick ceiling of this run
    pub fn tick_ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Runs a single tick
    ///
    /// Returns the tick's trace entry, or `None` once every process is
    /// done. Fails when the clock reaches the tick ceiling first.
    pub fn step(&mut self) -> Result<Option<&TraceEntry>, SimulationError> {
        if self.table.is_all_finished() {
            return Ok(None);
        }
        if self.clock.now() >= self.ceiling {
            warn!(
                "{} simulation hit the {} tick ceiling with work remaining",
                self.algorithm, self.ceiling
            );
            return Err(SimulationError::TickCeilingReached {
                ceiling: self.ceiling,
            });
        }

        self.run_tick();
        Ok(self.trace.entries().last())
    }

    /// Runs until every process is done and derives the report
    pub fn run(mut self) -> Result<SimulationReport, SimulationError> {
        while self.step()?.is_some() {}

        info!(
            "{} simulation finished after {} ticks",
            self.algorithm,
            self.clock.now()
        );
        Ok(self.into_report())
    }

    /// Consumes the driver and derives metrics from its current state
    ///
    /// Processes that have not finished are left out of the per-process
    /// metrics.
    pub fn into_report(self) -> SimulationReport {
        SimulationReport::build(self.algorithm, &self.table, self.trace)
    }

    fn ctx(&self) -> PolicyContext<'_> {
        PolicyContext {
            table: &self.table,
            queues: &self.queues,
            running: self.running,
        }
    }

    fn run_tick(&mut self) {
        let tick = self.clock.now();
        let mut entry = TraceEntry::new(tick);

        self.retire_finished(&mut entry, tick);
        self.admit_arrivals(&mut entry, tick);
        self.check_preemption(&mut entry);
        self.dispatch(&mut entry, tick);
        self.execute(&mut entry);
        self.advance_io(&mut entry);

        entry.ready_queues = self.queues.snapshot();
        entry.waiting = self.table.waiting_pids();
        self.trace.push(entry);
        self.clock.advance();
    }

    fn retire_finished(&mut self, entry: &mut TraceEntry, tick: u64) {
        let Some(pid) = self.running else {
            return;
        };
        if !self.table.is_process_finished(pid) {
            return;
        }

        self.running = None;
        self.table.complete(pid, tick);
        if let Some(record) = self.table.get_record(pid) {
            debug!("t={} {} completed", tick, pid);
            entry.record(EventKind::Completed {
                pid,
                turnaround_time: record.turnaround_time().unwrap_or(0),
                waiting_time: record.waiting_time().unwrap_or(0),
            });
        }
    }

    fn admit_arrivals(&mut self, entry: &mut TraceEntry, tick: u64) {
        while let Some(pid) = self.table.next_arrival(tick) {
            let level = self.policy.entry_level();
            self.table.set_state(pid, ProcessState::Ready);
            self.table.set_priority(pid, level);
            self.queues.enqueue(level, pid);
            entry.new_arrivals.push(pid);
            entry.record(EventKind::Arrived { pid, level });
            debug!("t={} {} arrived", tick, pid);

            if self.policy.admit_new_arrival(&self.ctx(), pid) {
                self.preempt_running(entry, PreemptCause::Arrival, pid);
            }
        }
    }

    fn check_preemption(&mut self, entry: &mut TraceEntry) {
        if self.policy.boost_due(&self.clock) {
            self.priority_boost(entry);
        }

        let Some(pid) = self.running else {
            return;
        };
        let Some(record) = self.table.get_record(pid) else {
            return;
        };

        let expired = self.policy.preempts_on_timeout()
            && record.quantum_remaining() == Some(0)
            && !self.table.is_process_finished(pid);
        if expired {
            let from_level = record.priority_level();
            let Requeue { level } = self.policy.on_quantum_expiry(&self.ctx(), pid);
            self.running = None;
            self.requeue(pid, level);
            debug!("{} quantum expired, level {} -> {}", pid, from_level, level);
            entry.record(EventKind::QuantumExpired {
                pid,
                from_level,
                to_level: level,
            });
        } else if self.policy.should_preempt_running(&self.ctx()) {
            if let Some(by) = self.policy.select_candidate(&self.ctx()) {
                self.preempt_running(entry, PreemptCause::ShorterRemaining, by);
            }
        }
    }

    /// Resets every process to level 0 and takes the CPU away
    ///
    /// Queued processes keep their relative order by originating level;
    /// the preempted process goes last.
    fn priority_boost(&mut self, entry: &mut TraceEntry) {
        let preempted = self.running.take();
        let boosted = self.queues.boost_to_top();
        self.table.reset_priorities();
        if let Some(pid) = preempted {
            self.requeue(pid, 0);
        }

        debug!(
            "t={} priority boost: {} queued, preempted {:?}",
            self.clock.now(),
            boosted.len(),
            preempted
        );
        entry.record(EventKind::PriorityBoost { boosted, preempted });
    }

    fn dispatch(&mut self, entry: &mut TraceEntry, tick: u64) {
        if self.running.is_some() {
            return;
        }
        let Some(pid) = self.policy.select_candidate(&self.ctx()) else {
            return;
        };

        let level = match self.queues.remove_everywhere(pid) {
            Some(level) => level,
            None => self
                .table
                .get_record(pid)
                .map(|record| record.priority_level())
                .unwrap_or(0),
        };
        let quantum = self.queues.quantum_at(level);

        self.table.set_state(pid, ProcessState::Running);
        self.table.set_quantum_left(pid, quantum);
        let first_dispatch = self.table.set_scheduled_time(pid, tick);
        self.running = Some(pid);

        debug!("t={} dispatch {} from level {}", tick, pid, level);
        entry.record(EventKind::Dispatched {
            pid,
            level,
            quantum,
            first_dispatch,
        });
    }

    fn execute(&mut self, entry: &mut TraceEntry) {
        let Some(pid) = self.running else {
            return;
        };

        if let Some(duration) = self.table.start_io(pid) {
            self.running = None;
            debug!("{} blocked on I/O for {} ticks", pid, duration);
            entry.record(EventKind::IoStarted { pid, duration });
            return;
        }

        self.table.tick_cpu_time(pid);
        self.table.tick_quantum(pid);
        entry.running_pid = Some(pid);
    }

    fn advance_io(&mut self, entry: &mut TraceEntry) {
        for pid in self.table.handle_io_tick() {
            let action = self.policy.on_io_return(&self.ctx(), pid);
            self.requeue(pid, action.level);
            debug!("{} finished I/O", pid);
            entry.record(EventKind::IoCompleted {
                pid,
                level: action.level,
            });

            if action.preempt_running {
                self.preempt_running(entry, PreemptCause::IoReturn, pid);
            }
        }
    }

    /// Returns the running process to the tail of its current level
    ///
    /// A process that has already consumed its whole burst keeps the CPU
    /// and is retired at the start of the next tick.
    fn preempt_running(&mut self, entry: &mut TraceEntry, cause: PreemptCause, by: Pid) {
        let Some(pid) = self.running else {
            return;
        };
        if self.table.is_process_finished(pid) {
            return;
        }
        let level = self
            .table
            .get_record(pid)
            .map(|record| record.priority_level())
            .unwrap_or(0);

        self.running = None;
        self.requeue(pid, level);
        debug!("{} preempted by {} ({:?})", pid, by, cause);
        entry.record(EventKind::Preempted {
            pid,
            level,
            cause,
            by,
        });
    }

    fn requeue(&mut self, pid: Pid, level: usize) {
        self.table.set_state(pid, ProcessState::Ready);
        self.table.set_priority(pid, level);
        self.queues.enqueue(level, pid);
    }
}

/// Runs `scenario` to completion with the default configuration
pub fn simulate(scenario: &Scenario) -> Result<SimulationReport, SimulationError> {
    SimulationDriver::new(scenario, SimulationConfig::default())?.run()
}
