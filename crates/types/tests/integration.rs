//! Integration tests for types

#[cfg(test)]
mod tests {
    use lapse_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_timer_id_display() {
        let id = TimerId::new(3, 7);
        assert_eq!(id.to_string(), "t3v7");
        assert_eq!(id.index(), 3);
        assert_eq!(id.generation(), 7);
    }

    #[test]
    fn test_clock_kind_serialization() {
        let json = serde_json::to_string(&ClockKind::Monotonic).unwrap();
        assert_eq!(json, r#""monotonic""#);

        let parsed: ClockKind = serde_json::from_str(r#""system""#).unwrap();
        assert_eq!(parsed, ClockKind::System);
        assert_eq!(ClockKind::default(), ClockKind::System);
    }

    #[test]
    fn test_clock_kind_from_str() {
        assert_eq!("Monotonic".parse::<ClockKind>(), Ok(ClockKind::Monotonic));
        assert_eq!("wall".parse::<ClockKind>(), Ok(ClockKind::System));
        assert!("sundial".parse::<ClockKind>().is_err());
    }

    #[test]
    fn test_timestamp_is_transparent_in_json() {
        let json = serde_json::to_string(&Timestamp::from_secs(42)).unwrap();
        assert_eq!(json, "42");
    }

    proptest! {
        #[test]
        fn prop_plus_then_since(
            base in -1_000_000_000i64..1_000_000_000,
            delta in 0i64..1_000_000,
        ) {
            let start = Timestamp::from_secs(base);
            prop_assert_eq!(start.plus_secs(delta).secs_since(start), delta);
        }
    }
}
