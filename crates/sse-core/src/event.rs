//! The decoded event record

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Event type used when a block carries no (or an empty) `event:` field
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A single event dispatched from an event stream
///
/// Instances are immutable once built. `event` is never empty; `data` and `id`
/// are always present, possibly as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerSentEvent {
    event: String,
    data: String,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry: Option<u64>,
}

impl ServerSentEvent {
    /// Create an event of the default `"message"` type with the given data
    pub fn new(data: impl Into<String>) -> Self {
        Self::default().with_data(data)
    }

    /// Set the event type; an empty string falls back to `"message"`
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        let event = event.into();
        self.event = if event.is_empty() {
            DEFAULT_EVENT_TYPE.to_string()
        } else {
            event
        };
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_retry(mut self, retry: Option<u64>) -> Self {
        self.retry = retry;
        self
    }

    /// Event type (`"message"` unless the stream named one)
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Event payload; multiple `data:` lines are joined with `\n`
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Last event id in effect when this event was dispatched
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reconnection time in milliseconds, if the block carried a valid `retry:`
    pub fn retry(&self) -> Option<u64> {
        self.retry
    }

    /// Deserialize the data payload as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.data)
    }
}

impl Default for ServerSentEvent {
    fn default() -> Self {
        Self {
            event: DEFAULT_EVENT_TYPE.to_string(),
            data: String::new(),
            id: String::new(),
            retry: None,
        }
    }
}
