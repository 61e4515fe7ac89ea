//! Shortest time to completion first

use super::{min_in_entry_queue, PolicyContext, SchedulingPolicy};
use crate::pcb::ProcessRecord;
use crate::ready_queue::ReadyQueueSet;
use sched_types::{AlgorithmKind, Pid};

/// Preemptive shortest remaining burst
///
/// The running process is preempted only when a ready process needs
/// strictly fewer ticks to finish; equal remaining time keeps the
/// incumbent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StcfPolicy;

impl StcfPolicy {
    fn beats_running(ctx: &PolicyContext<'_>, challenger: &ProcessRecord) -> bool {
        ctx.running_record()
            .map(|running| challenger.remaining_burst() < running.remaining_burst())
            .unwrap_or(false)
    }
}

impl SchedulingPolicy for StcfPolicy {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Stcf
    }

    fn initialize_queues(&self) -> ReadyQueueSet {
        ReadyQueueSet::single_unbounded()
    }

    fn select_candidate(&self, ctx: &PolicyContext<'_>) -> Option<Pid> {
        min_in_entry_queue(ctx, |record| {
            (record.remaining_burst(), record.arrival_time(), record.pid())
        })
    }

    fn admit_new_arrival(&self, ctx: &PolicyContext<'_>, pid: Pid) -> bool {
        ctx.record(pid)
            .map(|record| Self::beats_running(ctx, record))
            .unwrap_or(false)
    }

    fn should_preempt_running(&self, ctx: &PolicyContext<'_>) -> bool {
        self.select_candidate(ctx)
            .and_then(|pid| ctx.record(pid))
            .map(|best| Self::beats_running(ctx, best))
            .unwrap_or(false)
    }
}
