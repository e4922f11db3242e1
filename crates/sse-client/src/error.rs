//! Error types for SSE client operations

use thiserror::Error;

use crate::config::ContentTypePolicy;

/// Result type alias for SSE client operations
pub type Result<T> = std::result::Result<T, SseError>;

/// Errors that can occur while opening or reading an event stream
///
/// Malformed lines inside a stream are not errors; the decoder drops them.
#[derive(Error, Debug)]
pub enum SseError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error while reading the body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The response is not an event stream; raised before any event is yielded
    #[error("Expected response header Content-Type {policy} 'text/event-stream', got {content_type:?}")]
    InvalidContentType {
        policy: ContentTypePolicy,
        content_type: String,
    },

    /// A configured header could not be turned into a request header
    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },
}

impl SseError {
    /// Whether this is the content-type protocol error
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::InvalidContentType { .. })
    }

    pub(crate) fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
