//! Per-timer fields and completion-time prediction

use lapse_types::Timestamp;

/// Clamp a reported fraction into [0.0, 1.0]. NaN counts as no progress.
#[must_use]
pub fn clamp_fraction(fraction: f32) -> f32 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Linear extrapolation of the completion time.
///
/// `start + elapsed / fraction`, truncated to whole seconds. `None` when no
/// progress has been reported, since the total is unknowable at 0%. A clock
/// that reads earlier than `start` counts as zero elapsed time.
#[must_use]
pub fn predict_end(start: Timestamp, now: Timestamp, fraction: f32) -> Option<Timestamp> {
    if fraction <= 0.0 || fraction.is_nan() {
        return None;
    }
    let elapsed = now.secs_since(start).max(0);
    let predicted_total = (elapsed as f32 / fraction) as i64;
    Some(start.plus_secs(predicted_total))
}

/// The five host-visible fields of a timer.
///
/// Setters are the permissive attribute surface: they store the value
/// (clamping the fraction and normalising empty labels) without recomputing
/// the prediction or notifying anyone.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    fraction: f32,
    start: Timestamp,
    now: Timestamp,
    predicted_end: Timestamp,
    state_name: Option<String>,
}

impl TimerState {
    /// Fresh baseline: everything at `now`, no progress, no label
    #[must_use]
    pub fn started_at(now: Timestamp) -> Self {
        Self {
            fraction: 0.0,
            start: now,
            now,
            predicted_end: now,
            state_name: None,
        }
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn predicted_end(&self) -> Timestamp {
        self.predicted_end
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state_name.as_deref()
    }

    /// Seconds between start and the last update, never negative
    pub fn elapsed_secs(&self) -> i64 {
        self.now.secs_since(self.start).max(0)
    }

    pub fn set_fraction(&mut self, fraction: f32) {
        self.fraction = clamp_fraction(fraction);
    }

    pub fn set_start(&mut self, start: Timestamp) {
        self.start = start;
    }

    pub fn set_now(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn set_predicted_end(&mut self, predicted_end: Timestamp) {
        self.predicted_end = predicted_end;
    }

    /// Replace the label; `None` or an empty string clears it
    pub fn set_state_name(&mut self, name: Option<&str>) {
        self.state_name = name.filter(|name| !name.is_empty()).map(str::to_owned);
    }

    pub(crate) fn restart(&mut self, now: Timestamp) {
        *self = Self::started_at(now);
    }

    pub(crate) fn record_progress(&mut self, fraction: f32, now: Timestamp) {
        self.fraction = clamp_fraction(fraction);
        self.now = now;
        self.refresh_prediction();
    }

    pub(crate) fn record_touch(&mut self, now: Timestamp) {
        self.now = now;
        self.refresh_prediction();
        if self.predicted_end < now {
            self.predicted_end = now;
        }
    }

    fn refresh_prediction(&mut self) {
        if let Some(end) = predict_end(self.start, self.now, self.fraction) {
            self.predicted_end = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn halfway_after_ten_seconds_predicts_twenty() {
        assert_eq!(predict_end(ts(1_000), ts(1_010), 0.5), Some(ts(1_020)));
    }

    #[test]
    fn zero_fraction_has_no_prediction() {
        assert_eq!(predict_end(ts(0), ts(10), 0.0), None);
        assert_eq!(predict_end(ts(0), ts(10), f32::NAN), None);
    }

    #[test]
    fn zero_elapsed_predicts_start() {
        assert_eq!(predict_end(ts(50), ts(50), 0.3), Some(ts(50)));
    }

    #[test]
    fn clock_behind_start_counts_as_zero_elapsed() {
        assert_eq!(predict_end(ts(50), ts(40), 0.5), Some(ts(50)));
    }

    #[test]
    fn progress_with_zero_keeps_previous_prediction() {
        let mut state = TimerState::started_at(ts(0));
        state.record_progress(0.5, ts(10));
        assert_eq!(state.predicted_end(), ts(20));
        state.record_progress(0.0, ts(15));
        assert_eq!(state.predicted_end(), ts(20));
        assert_eq!(state.now(), ts(15));
    }

    #[test]
    fn touch_raises_stale_prediction_to_now() {
        let mut state = TimerState::started_at(ts(0));
        state.record_touch(ts(30));
        assert_eq!(state.predicted_end(), ts(30));
        assert_eq!(state.fraction(), 0.0);
    }

    #[test]
    fn decreasing_progress_is_accepted() {
        let mut state = TimerState::started_at(ts(0));
        state.record_progress(0.8, ts(8));
        state.record_progress(0.4, ts(8));
        assert_eq!(state.fraction(), 0.4);
        assert_eq!(state.predicted_end(), ts(20));
    }

    #[test]
    fn empty_label_clears() {
        let mut state = TimerState::started_at(ts(0));
        state.set_state_name(Some("copying"));
        assert_eq!(state.state_name(), Some("copying"));
        state.set_state_name(Some(""));
        assert_eq!(state.state_name(), None);
        state.set_state_name(Some("formatting"));
        state.set_state_name(None);
        assert_eq!(state.state_name(), None);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_unit_range(fraction in proptest::num::f32::ANY) {
            let clamped = clamp_fraction(fraction);
            prop_assert!((0.0..=1.0).contains(&clamped));
            if (0.0..=1.0).contains(&fraction) {
                prop_assert_eq!(clamped, fraction);
            }
        }

        #[test]
        fn prediction_never_precedes_start(
            start in -1_000_000i64..1_000_000,
            elapsed in 0i64..100_000,
            fraction in 0.001f32..=1.0,
        ) {
            let end = predict_end(ts(start), ts(start + elapsed), fraction).unwrap();
            prop_assert!(end >= ts(start));
        }
    }
}
