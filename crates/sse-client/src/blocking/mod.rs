//! Thread-blocking event streams
//!
//! Mirrors the async API on top of `reqwest::blocking`. Reading the next
//! event blocks the calling thread until a chunk arrives or the body ends.
//! Decoding is shared with the async adapters through
//! [`ChunkDecoder`](sse_core::ChunkDecoder).
//!
//! # Example
//!
//! ```no_run
//! use sse_client::blocking::{connect_sse, Client};
//! use reqwest::Method;
//!
//! # fn example() -> sse_client::Result<()> {
//! let client = Client::new();
//! let source = connect_sse(&client, Method::GET, "http://localhost:8000/sse")?;
//!
//! for event in source.events()? {
//!     let event = event?;
//!     println!("{}: {}", event.event(), event.data());
//! }
//! # Ok(())
//! # }
//! ```

mod iter;
mod source;

pub use iter::{DecodedIter, EventIter, LineIter};
pub use reqwest::blocking::Client;
pub use source::{connect_sse, EventSource, SseClient, SseRequestExt};
