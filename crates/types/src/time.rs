//! Coarse, seconds-resolution timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in time with whole-second resolution.
///
/// For the system clock the value counts seconds since the Unix epoch. Timers
/// only ever compare and subtract timestamps taken from the same clock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Current wall-clock time
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    #[must_use]
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.timestamp())
    }

    /// Interpret the value as epoch seconds. `None` when out of chrono's range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Seconds from `earlier` to `self`, saturating on overflow
    #[must_use]
    pub const fn secs_since(self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    #[must_use]
    pub const fn plus_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_since_is_signed() {
        let start = Timestamp::from_secs(100);
        let later = Timestamp::from_secs(130);
        assert_eq!(later.secs_since(start), 30);
        assert_eq!(start.secs_since(later), -30);
    }

    #[test]
    fn plus_secs_saturates() {
        let ts = Timestamp::from_secs(i64::MAX - 1);
        assert_eq!(ts.plus_secs(10).as_secs(), i64::MAX);
    }

    #[test]
    fn datetime_round_trip_keeps_seconds() {
        let ts = Timestamp::from_secs(1_700_000_000);
        let datetime = ts.to_datetime().expect("in range");
        assert_eq!(Timestamp::from(datetime), ts);
        assert_eq!(ts.to_string(), "2023-11-14T22:13:20Z");
    }
}
