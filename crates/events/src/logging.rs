//! Mirror emitted events into `tracing`

use tracing::{debug, error, info, trace, warn};

use crate::{EventLevel, EventMessage};

/// Log `message` at its metadata level with structured fields
pub fn log_event(message: &EventMessage) {
    let meta = &message.meta;
    if !tracing::level_enabled!(meta.tracing_level()) {
        return;
    }
    let timer = meta.labels.get("timer").map_or("-", String::as_str);

    macro_rules! record {
        ($log:ident) => {
            $log!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                correlation = ?meta.correlation_id,
                timer,
                "{}",
                message.event.summary()
            )
        };
    }

    match meta.level {
        EventLevel::Trace => record!(trace),
        EventLevel::Debug => record!(debug),
        EventLevel::Info => record!(info),
        EventLevel::Warn => record!(warn),
        EventLevel::Error => record!(error),
    }
}
