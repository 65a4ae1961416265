use std::sync::Mutex;

/// Severity of a registry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// A structured audit event emitted by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: EventLevel,
    pub message: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Event {
    pub fn new(level: EventLevel, message: &'static str) -> Self {
        Self {
            level,
            message,
            fields: Vec::new(),
        }
    }

    /// Attaches a key/value field to the event.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((key, value.into()));
        self
    }
}

/// Append-only sink for registry events.
///
/// Fire-and-forget: the registry never depends on anything a sink returns,
/// and a sink must not fail the operation that emitted the event.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

impl<E: EventSink> EventSink for std::sync::Arc<E> {
    fn emit(&self, event: Event) {
        (**self).emit(event)
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Sink that records events in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .expect("memory sink lock should not be poisoned")
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .expect("memory sink lock should not be poisoned")
            .push(event);
    }
}
