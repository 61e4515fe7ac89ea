//! Shortest job first

use super::{min_in_entry_queue, PolicyContext, SchedulingPolicy};
use crate::ready_queue::ReadyQueueSet;
use sched_types::{AlgorithmKind, Pid};

/// Non-preemptive shortest job first
///
/// Dispatches the ready process with the smallest total burst; ties go to
/// the earlier arrival, then the lower pid.
#[derive(Debug, Clone, Copy, Default)]
pub struct SjfPolicy;

impl SchedulingPolicy for SjfPolicy {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Sjf
    }

    fn initialize_queues(&self) -> ReadyQueueSet {
        ReadyQueueSet::single_unbounded()
    }

    fn select_candidate(&self, ctx: &PolicyContext<'_>) -> Option<Pid> {
        min_in_entry_queue(ctx, |record| {
            (record.burst_time(), record.arrival_time(), record.pid())
        })
    }
}
