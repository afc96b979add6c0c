//! Point-in-time view of a timer and its human-readable formatting

use lapse_types::{TimerId, Timestamp};
use serde::{Deserialize, Serialize};

/// Owned copy of a timer's fields, suitable for sending across a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub id: TimerId,
    /// The timer's own completion estimate (0.0-1.0)
    pub fraction: f32,
    /// Completion derived through the active nested timer, if any
    pub effective_fraction: f32,
    pub start: Timestamp,
    pub now: Timestamp,
    pub predicted_end: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    /// Nesting depth, 0 for a root timer
    pub depth: usize,
}

impl TimerSnapshot {
    /// Get progress as a percentage (0.0-100.0)
    #[must_use]
    pub fn percentage(&self) -> f64 {
        f64::from(self.effective_fraction) * 100.0
    }

    /// Seconds between start and the last update, never negative
    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        self.now.secs_since(self.start).max(0)
    }

    /// Seconds until the predicted end, `None` while no progress was reported
    #[must_use]
    pub fn remaining_secs(&self) -> Option<i64> {
        if self.fraction <= 0.0 {
            return None;
        }
        Some(self.predicted_end.secs_since(self.now).max(0))
    }

    /// Format ETA in human-readable format
    #[must_use]
    pub fn format_eta(&self) -> Option<String> {
        self.remaining_secs().map(|total_seconds| {
            if total_seconds > 3600 {
                let hours = total_seconds / 3600;
                let minutes = (total_seconds % 3600) / 60;
                format!("{hours}h {minutes}m")
            } else if total_seconds > 60 {
                let minutes = total_seconds / 60;
                let seconds = total_seconds % 60;
                format!("{minutes}m {seconds}s")
            } else {
                format!("{total_seconds}s")
            }
        })
    }

    /// One-line status such as `copying 42.0% (ETA 1m 5s)`
    #[must_use]
    pub fn describe(&self) -> String {
        let label = self.state_name.as_deref().unwrap_or("working");
        match self.format_eta() {
            Some(eta) => format!("{label} {:.1}% (ETA {eta})", self.percentage()),
            None => format!("{label} {:.1}%", self.percentage()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(fraction: f32, start: i64, now: i64, predicted_end: i64) -> TimerSnapshot {
        TimerSnapshot {
            id: TimerId::new(0, 1),
            fraction,
            effective_fraction: fraction,
            start: Timestamp::from_secs(start),
            now: Timestamp::from_secs(now),
            predicted_end: Timestamp::from_secs(predicted_end),
            state_name: None,
            depth: 0,
        }
    }

    #[test]
    fn eta_is_absent_without_progress() {
        let snap = snapshot(0.0, 100, 110, 100);
        assert_eq!(snap.remaining_secs(), None);
        assert_eq!(snap.format_eta(), None);
        assert_eq!(snap.describe(), "working 0.0%");
    }

    #[test]
    fn eta_formats_by_magnitude() {
        assert_eq!(snapshot(0.5, 0, 10, 20).format_eta().as_deref(), Some("10s"));
        assert_eq!(snapshot(0.5, 0, 0, 125).format_eta().as_deref(), Some("2m 5s"));
        assert_eq!(
            snapshot(0.1, 0, 0, 7_380).format_eta().as_deref(),
            Some("2h 3m")
        );
    }

    #[test]
    fn remaining_never_negative() {
        let snap = snapshot(1.0, 0, 50, 40);
        assert_eq!(snap.remaining_secs(), Some(0));
        assert_eq!(snap.elapsed_secs(), 50);
    }

    #[test]
    fn describe_uses_state_name() {
        let mut snap = snapshot(0.25, 0, 10, 40);
        snap.state_name = Some("copying".to_string());
        assert_eq!(snap.describe(), "copying 25.0% (ETA 30s)");
    }
}
