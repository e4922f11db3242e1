//! Field-level event decoding
//!
//! Interprets logical lines per the WHATWG event-stream rules:
//! <https://html.spec.whatwg.org/multipage/server-sent-events.html#event-stream-interpretation>

use tracing::trace;

use crate::event::ServerSentEvent;

/// Accumulates field lines into events, one per blank-line-delimited block
///
/// Malformed lines never fail: a `retry:` that is not an integer, an `id:`
/// containing NUL and unknown field names are dropped and decoding continues.
/// A block that is still open when the stream ends is never dispatched.
#[derive(Debug, Default)]
pub struct EventDecoder {
    event: String,
    data: Vec<String>,
    retry: Option<u64>,
    /// Survives dispatch; only an accepted `id:` field changes it
    last_event_id: String,
    /// An `id:` field was accepted since the last dispatch
    id_in_block: bool,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id that would be attached to the next dispatched event
    ///
    /// Callers resuming a dropped stream send this as `Last-Event-ID`.
    pub fn last_event_id(&self) -> &str {
        &self.last_event_id
    }

    /// Decode one line (without its terminator)
    pub fn decode(&mut self, line: &str) -> Option<ServerSentEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        if let Some(comment) = line.strip_prefix(':') {
            trace!(comment, "SSE comment");
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => self.data.push(value.to_string()),
            "id" => {
                if value.contains('\0') {
                    trace!("SSE id containing NUL ignored");
                } else {
                    self.last_event_id = value.to_string();
                    self.id_in_block = true;
                }
            }
            "retry" => match parse_retry(value) {
                Some(retry) => self.retry = Some(retry),
                None => trace!(value, "SSE invalid retry ignored"),
            },
            _ => trace!(field, "SSE unknown field ignored"),
        }

        None
    }

    fn dispatch(&mut self) -> Option<ServerSentEvent> {
        if self.event.is_empty()
            && self.data.is_empty()
            && !self.id_in_block
            && self.retry.is_none()
        {
            return None;
        }

        let event = ServerSentEvent::default()
            .with_event(std::mem::take(&mut self.event))
            .with_data(std::mem::take(&mut self.data).join("\n"))
            .with_id(self.last_event_id.clone())
            .with_retry(self.retry.take());

        self.id_in_block = false;

        Some(event)
    }
}

/// Reconnection times are non-negative integers made of ASCII digits only
fn parse_retry(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
