//! Integration tests for events

#[cfg(test)]
mod tests {
    use lapse_events::*;
    use lapse_types::{TimerId, Timestamp};

    fn snapshot(id: TimerId, fraction: f32) -> TimerSnapshot {
        TimerSnapshot {
            id,
            fraction,
            effective_fraction: fraction,
            start: Timestamp::from_secs(10),
            now: Timestamp::from_secs(20),
            predicted_end: Timestamp::from_secs(30),
            state_name: Some("copying".into()),
            depth: 1,
        }
    }

    #[tokio::test]
    async fn test_event_sender_emitter() {
        let (tx, mut rx) = channel();
        let id = TimerId::new(0, 1);

        tx.emit(TimerEvent::Created { id });
        tx.emit(TimerEvent::Progress {
            snapshot: snapshot(id, 0.5),
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.event, TimerEvent::Created { .. }));
        assert_eq!(first.meta.level, EventLevel::Info);
        assert_eq!(first.meta.source, EventSource::TIMER);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.meta.level, EventLevel::Trace);
        assert_eq!(second.event.timer_id(), id);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit(TimerEvent::Reset {
            id: TimerId::new(1, 1),
        });
    }

    #[test]
    fn test_nesting_events_use_nesting_source() {
        let event = TimerEvent::NestedDestroyed {
            parent: TimerId::new(0, 1),
            child: TimerId::new(1, 1),
            released: 3,
        };
        assert_eq!(event.event_source(), EventSource::NESTING);
        assert_eq!(event.summary(), "nested timer destroyed");
        assert_eq!(event.timer_id(), TimerId::new(1, 1));
    }

    #[test]
    fn test_event_serialization() {
        let event = TimerEvent::StateChanged {
            id: TimerId::new(2, 1),
            state_name: Some("formatting".into()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["state_name"], "formatting");

        let message = EventMessage::from_event(event);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["meta"]["source"], "timer");
        assert_eq!(json["meta"]["level"], "debug");
    }

    #[test]
    fn test_meta_builders() {
        let meta = EventMeta::new(EventLevel::Warn, EventSource::TIMER)
            .with_correlation_id("t0v1")
            .with_label("state", "copying");
        assert_eq!(meta.correlation_id.as_deref(), Some("t0v1"));
        assert_eq!(meta.labels.get("state").map(String::as_str), Some("copying"));
        assert_eq!(meta.tracing_level(), tracing::Level::WARN);
    }
}
