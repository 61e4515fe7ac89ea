//! Round robin

use super::{PolicyContext, Requeue, SchedulingPolicy};
use crate::ready_queue::ReadyQueueSet;
use sched_types::{AlgorithmKind, Pid};

/// Time-sliced FIFO
///
/// One queue with a fixed quantum. A process whose quantum runs out goes
/// to the tail of the queue; arrivals never preempt.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobinPolicy {
    quantum: u64,
}

impl RoundRobinPolicy {
    pub fn new(quantum: u64) -> Self {
        Self { quantum }
    }

    pub fn quantum(&self) -> u64 {
        self.quantum
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::RoundRobin
    }

    fn initialize_queues(&self) -> ReadyQueueSet {
        ReadyQueueSet::new(vec![Some(self.quantum)], None)
    }

    fn preempts_on_timeout(&self) -> bool {
        true
    }

    fn on_quantum_expiry(&self, _ctx: &PolicyContext<'_>, _pid: Pid) -> Requeue {
        Requeue { level: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::testing::{pid, Fixture};
    use sched_types::ProcessSpec;

    #[test]
    fn test_queue_carries_quantum() {
        let queues = RoundRobinPolicy::new(4).initialize_queues();
        assert_eq!(queues.quantum_at(0), Some(4));
    }

    #[test]
    fn test_expiry_requeues_at_tail_of_single_queue() {
        let policy = RoundRobinPolicy::new(2);
        let mut fixture = Fixture::new(
            &[ProcessSpec::new(0, 5), ProcessSpec::new(0, 5)],
            policy.initialize_queues(),
        );
        fixture.run(1, 0, 2).ready(2, 0);
        assert!(policy.preempts_on_timeout());
        assert_eq!(policy.on_quantum_expiry(&fixture.ctx(), pid(1)), Requeue { level: 0 });
        assert!(!policy.admit_new_arrival(&fixture.ctx(), pid(2)));
    }
}
