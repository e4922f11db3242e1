//! Request/response header contract for event streams
//!
//! See <https://html.spec.whatwg.org/multipage/server-sent-events.html#the-eventsource-interface>

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tracing::warn;

use crate::config::{media_type, ContentTypePolicy};
use crate::error::{Result, SseError};

/// Media type of an event stream
pub const EVENT_STREAM_MIME: &str = "text/event-stream";

/// Headers for a request that opens an event stream
///
/// Replaces any `Accept` or `Cache-Control` values already present.
pub fn set_request_headers(headers: &mut HeaderMap) {
    headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM_MIME));
    set_no_store(headers);
}

/// Disable caching of the request
pub fn set_no_store(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
}

/// Fail unless the response declares an event stream under `policy`
pub fn check_content_type(headers: &HeaderMap, policy: ContentTypePolicy) -> Result<()> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if policy.matches(content_type) {
        return Ok(());
    }

    warn!(content_type, %policy, "Rejecting non event-stream response");
    Err(SseError::InvalidContentType {
        policy,
        content_type: media_type(content_type).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers_replace_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=60"));

        set_request_headers(&mut headers);

        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
        assert_eq!(headers[ACCEPT], "text/event-stream");
        assert_eq!(headers[CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_check_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/event-stream; charset=utf-8"),
        );
        assert!(check_content_type(&headers, ContentTypePolicy::Exact).is_ok());
        assert!(check_content_type(&headers, ContentTypePolicy::Contains).is_ok());
    }

    #[test]
    fn test_check_content_type_mismatch() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));

        let err = check_content_type(&headers, ContentTypePolicy::Contains).unwrap_err();
        assert!(err.is_protocol_error());
        assert_eq!(
            err.to_string(),
            "Expected response header Content-Type to contain 'text/event-stream', got \"text/plain\""
        );
    }

    #[test]
    fn test_check_content_type_missing() {
        let err = check_content_type(&HeaderMap::new(), ContentTypePolicy::Exact).unwrap_err();
        assert!(err.to_string().contains("to be 'text/event-stream'"));
    }
}
