//! Multi-level ready queues
//!
//! A [`ReadyQueueSet`] holds N FIFO queues ordered by priority, level 0
//! first. Each level carries its own quantum; the set carries one global
//! allotment used by MLFQ priority boosting.
//!
//! A pid sits in at most one queue at a time and never while running.

use sched_types::Pid;
use std::collections::VecDeque;

/// One priority level
#[derive(Debug, Clone)]
struct ReadyLevel {
    queue: VecDeque<Pid>,
    /// Ticks per dispatch; `None` is unbounded
    quantum: Option<u64>,
}

/// Priority-ordered set of FIFO ready queues
#[derive(Debug, Clone)]
pub struct ReadyQueueSet {
    levels: Vec<ReadyLevel>,
    /// Boost period; `None` disables boosting
    allotment: Option<u64>,
}

impl ReadyQueueSet {
    /// Creates one queue per entry of `quantums`
    ///
    /// An empty `quantums` still yields a single unbounded level, so the
    /// set always has at least one queue.
    pub fn new(quantums: Vec<Option<u64>>, allotment: Option<u64>) -> Self {
        let mut levels: Vec<ReadyLevel> = quantums
            .into_iter()
            .map(|quantum| ReadyLevel {
                queue: VecDeque::new(),
                quantum,
            })
            .collect();
        if levels.is_empty() {
            levels.push(ReadyLevel {
                queue: VecDeque::new(),
                quantum: None,
            });
        }
        Self { levels, allotment }
    }

    /// A single queue with an unbounded quantum
    pub fn single_unbounded() -> Self {
        Self::new(vec![None], None)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Index of the lowest-priority level
    pub fn lowest_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn quantum_at(&self, level: usize) -> Option<u64> {
        self.levels.get(level).and_then(|level| level.quantum)
    }

    pub fn allotment(&self) -> Option<u64> {
        self.allotment
    }

    /// Read access to one level's queue, head first
    pub fn queue_at(&self, level: usize) -> Option<&VecDeque<Pid>> {
        self.levels.get(level).map(|level| &level.queue)
    }

    /// Appends `pid` at the tail of `level`
    ///
    /// Levels past the last one are clamped to the lowest level.
    pub fn enqueue(&mut self, level: usize, pid: Pid) {
        debug_assert!(
            self.level_of(pid).is_none(),
            "{} is already queued",
            pid
        );
        let level = level.min(self.lowest_level());
        self.levels[level].queue.push_back(pid);
    }

    /// Drains a level in queue order
    pub fn dequeue_all(&mut self, level: usize) -> Vec<Pid> {
        self.levels
            .get_mut(level)
            .map(|level| level.queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Removes `pid` from whichever queue holds it
    ///
    /// Linear scan over every queue. Returns the level the pid was removed
    /// from.
    pub fn remove_everywhere(&mut self, pid: Pid) -> Option<usize> {
        for (index, level) in self.levels.iter_mut().enumerate() {
            if let Some(position) = level.queue.iter().position(|&queued| queued == pid) {
                level.queue.remove(position);
                return Some(index);
            }
        }
        None
    }

    /// Level currently holding `pid`
    pub fn level_of(&self, pid: Pid) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.queue.contains(&pid))
    }

    /// Head of the first non-empty level, scanning from level 0
    pub fn first_ready(&self) -> Option<(usize, Pid)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(index, level)| level.queue.front().map(|&pid| (index, pid)))
    }

    /// Moves every process below level 0 to the tail of level 0
    ///
    /// Processes are appended by ascending originating level, preserving
    /// queue order within a level. Returns the moved pids in that order.
    pub fn boost_to_top(&mut self) -> Vec<Pid> {
        let mut boosted = Vec::new();
        for level in 1..self.levels.len() {
            boosted.extend(self.dequeue_all(level));
        }
        self.levels[0].queue.extend(boosted.iter().copied());
        boosted
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(|level| level.queue.is_empty())
    }

    /// Total number of queued pids
    pub fn len(&self) -> usize {
        self.levels.iter().map(|level| level.queue.len()).sum()
    }

    /// Copy of every queue, level 0 first
    pub fn snapshot(&self) -> Vec<Vec<Pid>> {
        self.levels
            .iter()
            .map(|level| level.queue.iter().copied().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> Pid {
        Pid::new(raw).unwrap()
    }

    #[test]
    fn test_single_unbounded() {
        let queues = ReadyQueueSet::single_unbounded();
        assert_eq!(queues.level_count(), 1);
        assert_eq!(queues.quantum_at(0), None);
        assert_eq!(queues.allotment(), None);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_empty_quantums_still_give_one_level() {
        let queues = ReadyQueueSet::new(Vec::new(), None);
        assert_eq!(queues.level_count(), 1);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut queues = ReadyQueueSet::single_unbounded();
        queues.enqueue(0, pid(2));
        queues.enqueue(0, pid(1));
        queues.enqueue(0, pid(3));
        assert_eq!(queues.first_ready(), Some((0, pid(2))));
        assert_eq!(queues.dequeue_all(0), vec![pid(2), pid(1), pid(3)]);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_first_ready_scans_levels_in_priority_order() {
        let mut queues = ReadyQueueSet::new(vec![Some(2), Some(4), Some(8)], Some(10));
        queues.enqueue(2, pid(1));
        queues.enqueue(1, pid(2));
        assert_eq!(queues.first_ready(), Some((1, pid(2))));
        queues.enqueue(0, pid(3));
        assert_eq!(queues.first_ready(), Some((0, pid(3))));
    }

    #[test]
    fn test_enqueue_clamps_to_lowest_level() {
        let mut queues = ReadyQueueSet::new(vec![Some(2), Some(4)], None);
        queues.enqueue(5, pid(1));
        assert_eq!(queues.level_of(pid(1)), Some(1));
    }

    #[test]
    fn test_remove_everywhere() {
        let mut queues = ReadyQueueSet::new(vec![Some(2), Some(4)], None);
        queues.enqueue(0, pid(1));
        queues.enqueue(1, pid(2));
        queues.enqueue(1, pid(3));

        assert_eq!(queues.remove_everywhere(pid(2)), Some(1));
        assert_eq!(queues.remove_everywhere(pid(2)), None);
        assert_eq!(queues.snapshot(), vec![vec![pid(1)], vec![pid(3)]]);
        assert_eq!(queues.len(), 2);
    }

    #[test]
    fn test_boost_orders_by_originating_level() {
        let mut queues = ReadyQueueSet::new(vec![Some(1), Some(2), Some(4)], Some(6));
        queues.enqueue(0, pid(1));
        queues.enqueue(2, pid(2));
        queues.enqueue(1, pid(3));
        queues.enqueue(1, pid(4));

        let boosted = queues.boost_to_top();
        assert_eq!(boosted, vec![pid(3), pid(4), pid(2)]);
        assert_eq!(
            queues.snapshot(),
            vec![vec![pid(1), pid(3), pid(4), pid(2)], vec![], vec![]]
        );
    }

    #[test]
    fn test_quantum_lookup() {
        let queues = ReadyQueueSet::new(vec![Some(2), Some(4)], Some(6));
        assert_eq!(queues.quantum_at(0), Some(2));
        assert_eq!(queues.quantum_at(1), Some(4));
        assert_eq!(queues.quantum_at(2), None);
        assert_eq!(queues.queue_at(2), None);
        assert_eq!(queues.lowest_level(), 1);
    }
}
