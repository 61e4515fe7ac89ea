//! Scheduling policies
//!
//! Each algorithm is one [`SchedulingPolicy`] implementation chosen once,
//! when the driver is built. The driver owns the mechanism (state changes,
//! queue moves, trace entries); a policy only answers questions about it:
//! which queues exist, who runs next, and whether an event preempts the
//! running process.

mod fcfs;
mod mlfq;
mod round_robin;
mod sjf;
mod stcf;

pub use fcfs::FcfsPolicy;
pub use mlfq::MlfqPolicy;
pub use round_robin::RoundRobinPolicy;
pub use sjf::SjfPolicy;
pub use stcf::StcfPolicy;

use crate::clock::SimulationClock;
use crate::config::AlgorithmConfig;
use crate::pcb::{PcbTable, ProcessRecord};
use crate::ready_queue::ReadyQueueSet;
use sched_types::{AlgorithmKind, Pid};

/// Read-only view of run state handed to policy hooks
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub table: &'a PcbTable,
    pub queues: &'a ReadyQueueSet,
    /// Process holding the CPU, if any
    pub running: Option<Pid>,
}

impl<'a> PolicyContext<'a> {
    pub fn record(&self, pid: Pid) -> Option<&'a ProcessRecord> {
        self.table.get_record(pid)
    }

    pub fn running_record(&self) -> Option<&'a ProcessRecord> {
        self.running.and_then(|pid| self.table.get_record(pid))
    }
}

/// Where a process goes back to after leaving the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requeue {
    pub level: usize,
}

/// Outcome of a process finishing an I/O window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoReturn {
    /// Level the returning process is queued at
    pub level: usize,
    /// Whether the running process must give up the CPU
    pub preempt_running: bool,
}

/// Rule set of a scheduling algorithm
pub trait SchedulingPolicy: Send {
    fn kind(&self) -> AlgorithmKind;

    /// Builds the ready queues for a fresh run
    fn initialize_queues(&self) -> ReadyQueueSet;

    /// Level that new arrivals are queued at
    fn entry_level(&self) -> usize {
        0
    }

    /// Picks the next process to dispatch without removing it
    ///
    /// The default takes the head of the first non-empty level.
    fn select_candidate(&self, ctx: &PolicyContext<'_>) -> Option<Pid> {
        ctx.queues.first_ready().map(|(_, pid)| pid)
    }

    /// Called after `pid` has been queued on arrival; true preempts the
    /// running process
    fn admit_new_arrival(&self, _ctx: &PolicyContext<'_>, _pid: Pid) -> bool {
        false
    }

    /// Whether an exhausted quantum takes the CPU away
    fn preempts_on_timeout(&self) -> bool {
        false
    }

    /// Requeue target for a running process whose quantum reached zero
    fn on_quantum_expiry(&self, ctx: &PolicyContext<'_>, pid: Pid) -> Requeue {
        Requeue {
            level: ctx
                .record(pid)
                .map(ProcessRecord::priority_level)
                .unwrap_or(0),
        }
    }

    /// Requeue target for `pid` after its I/O window completed
    ///
    /// Returning processes always re-enter at the entry level. Whether they
    /// preempt follows the arrival rule.
    fn on_io_return(&self, ctx: &PolicyContext<'_>, pid: Pid) -> IoReturn {
        IoReturn {
            level: self.entry_level(),
            preempt_running: self.admit_new_arrival(ctx, pid),
        }
    }

    /// Per-tick preemption check on the running process
    fn should_preempt_running(&self, _ctx: &PolicyContext<'_>) -> bool {
        false
    }

    /// True when a priority boost must happen at the clock's current tick
    ///
    /// Reports each boost tick at most once.
    fn boost_due(&mut self, _clock: &SimulationClock) -> bool {
        false
    }
}

/// Builds the policy for a validated algorithm configuration
pub fn policy_for(config: &AlgorithmConfig) -> Box<dyn SchedulingPolicy> {
    match config {
        AlgorithmConfig::Fcfs => Box::new(FcfsPolicy),
        AlgorithmConfig::Sjf => Box::new(SjfPolicy),
        AlgorithmConfig::Stcf => Box::new(StcfPolicy),
        AlgorithmConfig::RoundRobin { quantum } => Box::new(RoundRobinPolicy::new(*quantum)),
        AlgorithmConfig::Mlfq {
            quantums,
            allotment,
        } => Box::new(MlfqPolicy::new(quantums.clone(), *allotment)),
    }
}

/// Queued process in level 0 minimizing `key`
fn min_in_entry_queue<K, F>(ctx: &PolicyContext<'_>, mut key: F) -> Option<Pid>
where
    K: Ord,
    F: FnMut(&ProcessRecord) -> K,
{
    ctx.queues
        .queue_at(0)?
        .iter()
        .filter_map(|&pid| ctx.record(pid))
        .min_by_key(|&record| key(record))
        .map(ProcessRecord::pid)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_for_matches_kind() {
        let configs = [
            AlgorithmConfig::Fcfs,
            AlgorithmConfig::Sjf,
            AlgorithmConfig::Stcf,
            AlgorithmConfig::RoundRobin { quantum: 2 },
            AlgorithmConfig::Mlfq {
                quantums: vec![2, 4],
                allotment: 6,
            },
        ];
        for config in configs {
            assert_eq!(policy_for(&config).kind(), config.kind());
        }
    }

    #[test]
    fn test_queue_shapes() {
        let rr = policy_for(&AlgorithmConfig::RoundRobin { quantum: 3 }).initialize_queues();
        assert_eq!(rr.level_count(), 1);
        assert_eq!(rr.quantum_at(0), Some(3));

        let mlfq = policy_for(&AlgorithmConfig::Mlfq {
            quantums: vec![2, 4, 8],
            allotment: 20,
        })
        .initialize_queues();
        assert_eq!(mlfq.level_count(), 3);
        assert_eq!(mlfq.quantum_at(2), Some(8));
        assert_eq!(mlfq.allotment(), Some(20));

        for config in [AlgorithmConfig::Fcfs, AlgorithmConfig::Sjf, AlgorithmConfig::Stcf] {
            let queues = policy_for(&config).initialize_queues();
            assert_eq!(queues.level_count(), 1);
            assert_eq!(queues.quantum_at(0), None);
            assert_eq!(queues.allotment(), None);
        }
    }
}
