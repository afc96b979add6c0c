//! Generational timer handles

use serde::{Deserialize, Serialize};

/// Handle to a timer inside a timer tree.
///
/// A handle stays valid until the timer it names is destroyed. The slot may be
/// reused afterwards, but with a bumped generation, so a stale handle never
/// aliases the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId {
    index: usize,
    generation: u32,
}

impl TimerId {
    #[must_use]
    pub const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the owning tree
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}v{}", self.index, self.generation)
    }
}
