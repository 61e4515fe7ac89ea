//! First come, first served

use super::SchedulingPolicy;
use crate::ready_queue::ReadyQueueSet;
use sched_types::AlgorithmKind;

/// Non-preemptive FIFO
///
/// One unbounded queue; processes run to completion (or I/O) in the order
/// they became ready. Arrival ties are already broken by pid when the
/// driver admits them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FcfsPolicy;

impl SchedulingPolicy for FcfsPolicy {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Fcfs
    }

    fn initialize_queues(&self) -> ReadyQueueSet {
        ReadyQueueSet::single_unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::testing::{pid, Fixture};
    use sched_types::ProcessSpec;

    #[test]
    fn test_selects_queue_head() {
        let mut fixture = Fixture::new(
            &[ProcessSpec::new(0, 9), ProcessSpec::new(0, 1)],
            FcfsPolicy.initialize_queues(),
        );
        fixture.ready(1, 0).ready(2, 0);
        assert_eq!(FcfsPolicy.select_candidate(&fixture.ctx()), Some(pid(1)));
    }

    #[test]
    fn test_never_preempts() {
        let mut fixture = Fixture::new(
            &[ProcessSpec::new(0, 9), ProcessSpec::new(1, 1)],
            FcfsPolicy.initialize_queues(),
        );
        fixture.run(1, 0, 1).ready(2, 0);
        let ctx = fixture.ctx();
        assert!(!FcfsPolicy.admit_new_arrival(&ctx, pid(2)));
        assert!(!FcfsPolicy.on_io_return(&ctx, pid(2)).preempt_running);
        assert!(!FcfsPolicy.preempts_on_timeout());
        assert!(!FcfsPolicy.should_preempt_running(&ctx));
    }
}
