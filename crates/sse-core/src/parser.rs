//! Byte-chunk pipelines
//!
//! Transport adapters only know how to fetch "the next chunk or end of
//! body". Everything after that lives here, so blocking and async adapters
//! share one decoding path.

use crate::decoder::EventDecoder;
use crate::event::ServerSentEvent;
use crate::lines::LineSplitter;
use crate::text::TextDecoder;

/// A decoder driven by raw body chunks
pub trait ChunkDecoder {
    type Output;

    /// Decode one body chunk
    fn decode_chunk(&mut self, bytes: &[u8]) -> Vec<Self::Output>;

    /// Body exhausted; emit anything still buffered
    ///
    /// Called once. Further calls return nothing.
    fn finish(&mut self) -> Vec<Self::Output>;
}

/// Bytes to logical lines
#[derive(Debug, Default)]
pub struct LineParser {
    text: TextDecoder,
    lines: LineSplitter,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed already-decoded text
    pub fn feed_str(&mut self, chunk: &str) -> Vec<String> {
        self.lines.feed(chunk)
    }
}

impl ChunkDecoder for LineParser {
    type Output = String;

    fn decode_chunk(&mut self, bytes: &[u8]) -> Vec<String> {
        let text = self.text.decode(bytes);
        self.lines.feed(&text)
    }

    fn finish(&mut self) -> Vec<String> {
        let mut lines = match self.text.finish() {
            Some(text) => self.lines.feed(&text),
            None => Vec::new(),
        };
        lines.extend(std::mem::take(&mut self.lines).flush());
        lines
    }
}

/// Bytes to events: text decoding, line splitting and field decoding
#[derive(Debug, Default)]
pub struct EventParser {
    lines: LineParser,
    events: EventDecoder,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed already-decoded text
    pub fn feed_str(&mut self, chunk: &str) -> Vec<ServerSentEvent> {
        let lines = self.lines.feed_str(chunk);
        self.decode_lines(lines)
    }

    /// Id of the most recent accepted `id:` field
    pub fn last_event_id(&self) -> &str {
        self.events.last_event_id()
    }

    fn decode_lines(&mut self, lines: Vec<String>) -> Vec<ServerSentEvent> {
        lines
            .iter()
            .filter_map(|line| self.events.decode(line))
            .collect()
    }
}

impl ChunkDecoder for EventParser {
    type Output = ServerSentEvent;

    fn decode_chunk(&mut self, bytes: &[u8]) -> Vec<ServerSentEvent> {
        let lines = self.lines.decode_chunk(bytes);
        self.decode_lines(lines)
    }

    fn finish(&mut self) -> Vec<ServerSentEvent> {
        let lines = self.lines.finish();
        self.decode_lines(lines)
    }
}
