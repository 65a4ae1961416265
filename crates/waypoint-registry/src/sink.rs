use tracing::{error, info, warn};
use waypoint_core::{Event, EventLevel, EventSink, LinkRecord};

/// Builds the audit event for a freshly created record.
pub(crate) fn created(record: &LinkRecord) -> Event {
    let validity_minutes = record
        .expires_at
        .duration_since(record.created_at)
        .as_mins();

    Event::new(EventLevel::Info, "create_short")
        .with("code", record.code.as_str())
        .with("url", record.original_url.as_str())
        .with("validity", validity_minutes.to_string())
}

/// [`EventSink`] that forwards registry events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        let fields = event
            .fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");

        match event.level {
            EventLevel::Info => info!(target: "waypoint::audit", %fields, "{}", event.message),
            EventLevel::Warn => warn!(target: "waypoint::audit", %fields, "{}", event.message),
            EventLevel::Error => error!(target: "waypoint::audit", %fields, "{}", event.message),
        }
    }
}
