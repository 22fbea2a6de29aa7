//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a worker within a run.
///
/// Ranks are dense: a run with `W` workers uses `Rank(0)..Rank(W-1)`,
/// laid out row-major over the block grid. `Rank(0)` is the coordinator
/// that owns the global field during scatter and gather.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The coordinator rank.
    pub const COORDINATOR: Rank = Rank(0);

    /// Whether this rank is the coordinator.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }

    /// The rank as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Simulation step counter.
///
/// Step 0 is the priming exchange before the timed loop; the loop runs
/// steps `1..=STEPS`. Every halo message carries the step it was sent in
/// so the receiver can detect cross-step mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The priming exchange that fills the halo before the first step.
    pub const PRIME: StepId = StepId(0);

    /// The following step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_is_rank_zero() {
        assert!(Rank(0).is_coordinator());
        assert!(!Rank(3).is_coordinator());
        assert_eq!(Rank::COORDINATOR.index(), 0);
    }

    #[test]
    fn step_advances_by_one() {
        assert_eq!(StepId::PRIME.next(), StepId(1));
        assert_eq!(StepId(41).next().to_string(), "42");
    }
}
