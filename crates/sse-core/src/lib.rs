//! sse-core - Incremental decoding of the Server-Sent Events wire format
//!
//! The decoding pipeline has two stages:
//!
//! 1. [`LineSplitter`] turns arbitrarily fragmented text chunks into logical
//!    lines, recognising only `\r\n`, `\r` and `\n` as terminators.
//! 2. [`EventDecoder`] accumulates lines into [`ServerSentEvent`]s, one per
//!    blank-line-delimited block.
//!
//! [`EventParser`] wires both stages behind a UTF-8 [`TextDecoder`] so that
//! transport adapters only have to hand over raw body chunks.
//!
//! # Example
//!
//! ```
//! use sse_core::{ChunkDecoder, EventParser};
//!
//! let mut parser = EventParser::new();
//! let mut events = parser.decode_chunk(b"event: logline\ndata: New user");
//! events.extend(parser.decode_chunk(b" connected\n\n"));
//! events.extend(parser.finish());
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].event(), "logline");
//! assert_eq!(events[0].data(), "New user connected");
//! ```

pub mod decoder;
pub mod event;
pub mod lines;
pub mod parser;
pub mod text;

pub use decoder::EventDecoder;
pub use event::{ServerSentEvent, DEFAULT_EVENT_TYPE};
pub use lines::{split_lines, LineSplitter};
pub use parser::{ChunkDecoder, EventParser, LineParser};
pub use text::TextDecoder;
