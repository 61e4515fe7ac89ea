//! # Simulation Clock
//!
//! Logical tick counter for a single run.
//!
//! Each [`SimulationDriver`](crate::SimulationDriver) owns its own clock.
//! Clocks are never shared between runs, so concurrent simulations in one
//! host cannot observe or disturb each other's time.

/// Logical clock that only moves when told to
///
/// # Examples
///
/// ```
/// use sched_engine::SimulationClock;
///
/// let mut clock = SimulationClock::new();
/// assert_eq!(clock.now(), 0);
///
/// clock.advance();
/// clock.advance();
/// assert_eq!(clock.now(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationClock {
    tick: u64,
}

impl SimulationClock {
    /// Creates a clock at tick 0
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    /// Returns the current tick
    pub fn now(&self) -> u64 {
        self.tick
    }

    /// Advances the clock by one tick
    pub fn advance(&mut self) {
        self.tick = self.tick.saturating_add(1);
    }

    /// True when the current tick is a positive multiple of `period`
    pub fn is_positive_multiple_of(&self, period: u64) -> bool {
        period > 0 && self.tick > 0 && self.tick % period == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_starts_at_zero() {
        assert_eq!(SimulationClock::new().now(), 0);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut clock = SimulationClock::new();
        let mut last = clock.now();
        for _ in 0..5 {
            clock.advance();
            assert_eq!(clock.now(), last + 1);
            last = clock.now();
        }
    }

    #[test]
    fn test_independent_clocks() {
        let mut first = SimulationClock::new();
        let second = SimulationClock::new();
        first.advance();
        assert_eq!(first.now(), 1);
        assert_eq!(second.now(), 0);
    }

    #[test]
    fn test_positive_multiple() {
        let mut clock = SimulationClock::new();
        assert!(!clock.is_positive_multiple_of(3));
        for _ in 0..3 {
            clock.advance();
        }
        assert!(clock.is_positive_multiple_of(3));
        assert!(!clock.is_positive_multiple_of(2));
        assert!(!clock.is_positive_multiple_of(0));
    }
}
