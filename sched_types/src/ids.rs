//! Identifiers for simulated processes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a simulated process
///
/// Pids are positive and handed out sequentially, starting at 1, in the
/// order processes are registered with a run. They are only meaningful
/// within the run that assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Pid(u32);

/// Raw value that is not a valid pid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPid(pub u32);

impl fmt::Display for InvalidPid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pid {}: pids start at 1", self.0)
    }
}

impl std::error::Error for InvalidPid {}

impl Pid {
    /// Creates a pid from its raw value
    ///
    /// Returns `None` for zero, which is never a valid pid.
    pub fn new(raw: u32) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the pid assigned to the process registered at `index`
    /// (zero-based registration order).
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the zero-based registration index of this pid
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the raw numeric value
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Pid {
    type Error = InvalidPid;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Pid::new(raw).ok_or(InvalidPid(raw))
    }
}

impl From<Pid> for u32 {
    fn from(pid: Pid) -> Self {
        pid.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
