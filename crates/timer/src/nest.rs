//! How a nested timer's progress maps into its parent's

use serde::{Deserialize, Serialize};

use crate::state::clamp_fraction;

/// Slice `[start, start + share]` of the parent's progress that a nested
/// timer represents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NestSpan {
    start: f32,
    share: f32,
}

impl NestSpan {
    /// Span covering everything the parent has left to do
    #[must_use]
    pub fn remaining(parent_fraction: f32) -> Self {
        let start = clamp_fraction(parent_fraction);
        Self {
            start,
            share: 1.0 - start,
        }
    }

    /// Span of at most `share`, never reaching past 1.0
    #[must_use]
    pub fn with_share(parent_fraction: f32, share: f32) -> Self {
        let start = clamp_fraction(parent_fraction);
        Self {
            start,
            share: clamp_fraction(share).min(1.0 - start),
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn share(&self) -> f32 {
        self.share
    }

    pub fn end(&self) -> f32 {
        self.start + self.share
    }

    /// Parent fraction corresponding to `child_fraction` of this span
    pub fn scale(&self, child_fraction: f32) -> f32 {
        clamp_fraction(self.start + self.share * clamp_fraction(child_fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_span_covers_rest_of_parent() {
        let span = NestSpan::remaining(0.25);
        assert_eq!(span.start(), 0.25);
        assert_eq!(span.share(), 0.75);
        assert_eq!(span.end(), 1.0);
        assert_eq!(span.scale(0.0), 0.25);
        assert_eq!(span.scale(1.0), 1.0);
    }

    #[test]
    fn share_is_capped_by_remaining_progress() {
        let span = NestSpan::with_share(0.75, 0.5);
        assert_eq!(span.share(), 0.25);
        let span = NestSpan::with_share(0.0, 2.0);
        assert_eq!(span.share(), 1.0);
    }

    #[test]
    fn scale_maps_child_progress_linearly() {
        let span = NestSpan::with_share(0.5, 0.5);
        assert_eq!(span.scale(0.5), 0.75);
        assert_eq!(span.scale(-3.0), 0.5);
    }
}
