//! Multi-level feedback queue
//!
//! ## Rules
//!
//! - New arrivals and I/O returns enter level 0.
//! - A process that uses up its quantum drops one level (never below the
//!   lowest) and joins the tail of that level.
//! - An arrival or I/O return preempts the running process when the
//!   running process sits below level 0.
//! - Every positive multiple of the allotment triggers a priority boost:
//!   all processes go back to level 0 and the running process gives up
//!   the CPU. The driver performs the boost; this policy only decides when.

use super::{PolicyContext, Requeue, SchedulingPolicy};
use crate::clock::SimulationClock;
use crate::ready_queue::ReadyQueueSet;
use log::trace;
use sched_types::{AlgorithmKind, Pid};

/// MLFQ with per-level quanta and periodic priority boost
#[derive(Debug, Clone)]
pub struct MlfqPolicy {
    quantums: Vec<u64>,
    allotment: u64,
    /// Tick of the most recent boost
    last_boost: Option<u64>,
}

impl MlfqPolicy {
    /// `quantums` must be non-empty; validation happens in
    /// [`AlgorithmConfig`](crate::AlgorithmConfig).
    pub fn new(quantums: Vec<u64>, allotment: u64) -> Self {
        Self {
            quantums,
            allotment,
            last_boost: None,
        }
    }

    pub fn allotment(&self) -> u64 {
        self.allotment
    }

    fn lowest_level(&self) -> usize {
        self.quantums.len().saturating_sub(1)
    }
}

impl SchedulingPolicy for MlfqPolicy {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Mlfq
    }

    fn initialize_queues(&self) -> ReadyQueueSet {
        ReadyQueueSet::new(
            self.quantums.iter().map(|&quantum| Some(quantum)).collect(),
            Some(self.allotment),
        )
    }

    fn admit_new_arrival(&self, ctx: &PolicyContext<'_>, _pid: Pid) -> bool {
        ctx.running_record()
            .map(|running| running.priority_level() > 0)
            .unwrap_or(false)
    }

    fn preempts_on_timeout(&self) -> bool {
        true
    }

    fn on_quantum_expiry(&self, ctx: &PolicyContext<'_>, pid: Pid) -> Requeue {
        let level = ctx
            .record(pid)
            .map(|record| record.priority_level())
            .unwrap_or(0);
        Requeue {
            level: (level + 1).min(self.lowest_level()),
        }
    }

    fn boost_due(&mut self, clock: &SimulationClock) -> bool {
        let tick = clock.now();
        let due = clock.is_positive_multiple_of(self.allotment) && self.last_boost != Some(tick);
        if due {
            trace!("MLFQ boost due at tick {}", tick);
            self.last_boost = Some(tick);
        }
        due
    }
}
