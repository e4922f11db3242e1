//! Server-Sent Events over reqwest
//!
//! Turns an HTTP response body into a stream of [`ServerSentEvent`]s, with
//! request helpers that send the event-stream headers and check the response
//! content type before any event is produced.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use sse_client::{connect_sse, Method};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = reqwest::Client::new();
//!     let source = connect_sse(&client, Method::GET, "http://localhost:8000/sse").await?;
//!
//!     let mut events = source.events()?;
//!     while let Some(event) = events.try_next().await? {
//!         println!("{}: {}", event.event(), event.data());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Transport client
//!
//! [`SseClient`] wraps a `reqwest::Client` so every response it returns has
//! already been checked to be an event stream:
//!
//! ```rust,no_run
//! # async fn run() -> sse_client::Result<()> {
//! use sse_client::{ClientConfig, ContentTypePolicy, SseClient};
//!
//! let config = ClientConfig::builder()
//!     .content_type_policy(ContentTypePolicy::Contains)
//!     .build();
//! let client = SseClient::with_config(&config)?;
//! let events = client.get("http://localhost:8000/sse").await?.events()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides a disposable axum server:
//!
//! ```rust,ignore
//! use sse_client::testing::{chunked_route, TestServer};
//!
//! let server = TestServer::start(chunked_route("/sse", "text/event-stream", chunks)).await?;
//! let events = server.client.get(server.url("/sse")).await?.events()?;
//! ```

mod client;
mod config;
mod error;
mod headers;
mod source;
pub mod stream;
pub mod testing;

#[cfg(feature = "blocking")]
pub mod blocking;

pub use client::{SseClient, DEFAULT_CLIENT_POLICY};
pub use config::{media_type, ClientConfig, ClientConfigBuilder, ConfigError, ContentTypePolicy};
pub use error::{Result, SseError};
pub use headers::{check_content_type, set_no_store, set_request_headers, EVENT_STREAM_MIME};
pub use source::{connect_sse, EventSource, SseRequestExt, DEFAULT_SOURCE_POLICY};
pub use stream::{BodyStream, DecodedStream, EventStream, LineStream};

pub use reqwest::Method;

// Re-export the decoding layer
pub use sse_core::{
    ChunkDecoder, EventDecoder, EventParser, LineParser, LineSplitter, ServerSentEvent, TextDecoder,
    DEFAULT_EVENT_TYPE,
};
