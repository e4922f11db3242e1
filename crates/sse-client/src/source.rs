//! Event sources over async reqwest responses

use async_trait::async_trait;
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response};
use tracing::{debug, instrument};

use crate::config::ContentTypePolicy;
use crate::error::Result;
use crate::headers::{check_content_type, set_request_headers};
use crate::stream::{BodyStream, EventStream, LineStream};

/// Content-type policy used by [`EventSource`] unless told otherwise
pub const DEFAULT_SOURCE_POLICY: ContentTypePolicy = ContentTypePolicy::Contains;

/// A response that is expected to carry an event stream
///
/// The content type is checked when the body is first consumed through
/// [`EventSource::events`] or [`EventSource::lines`], so a mismatch fails
/// before any event is produced.
#[derive(Debug)]
pub struct EventSource {
    response: Response,
    policy: ContentTypePolicy,
}

impl EventSource {
    pub fn new(response: Response) -> Self {
        Self::with_policy(response, DEFAULT_SOURCE_POLICY)
    }

    pub fn with_policy(response: Response, policy: ContentTypePolicy) -> Self {
        Self { response, policy }
    }

    /// The underlying response (status, headers, final URL)
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    pub fn check_content_type(&self) -> Result<()> {
        check_content_type(self.response.headers(), self.policy)
    }

    /// Consume the body as a stream of events
    pub fn events(self) -> Result<EventStream> {
        self.check_content_type()?;
        Ok(EventStream::new(self.body()))
    }

    /// Consume the body as a stream of logical lines
    pub fn lines(self) -> Result<LineStream> {
        self.check_content_type()?;
        Ok(LineStream::new(self.body()))
    }

    fn body(self) -> BodyStream {
        Box::pin(self.response.bytes_stream())
    }
}

/// Open an event stream with `client`
///
/// Sends `Accept: text/event-stream` and `Cache-Control: no-store`.
pub async fn connect_sse(client: &Client, method: Method, url: impl IntoUrl) -> Result<EventSource> {
    client.request(method, url).connect_sse().await
}

/// Event-stream helpers on [`reqwest::RequestBuilder`]
#[async_trait]
pub trait SseRequestExt: Sized {
    /// Add the event-stream request headers, replacing existing values
    fn sse_headers(self) -> Self;

    /// Send the request with event-stream headers and wrap the response
    async fn connect_sse(self) -> Result<EventSource>;
}

#[async_trait]
impl SseRequestExt for RequestBuilder {
    fn sse_headers(self) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        set_request_headers(&mut headers);
        self.headers(headers)
    }

    #[instrument(skip(self))]
    async fn connect_sse(self) -> Result<EventSource> {
        let (client, request) = self.build_split();
        let mut request = request?;
        set_request_headers(request.headers_mut());

        debug!(method = %request.method(), url = %request.url(), "Connecting to SSE stream");
        let response = client.execute(request).await?;
        debug!(status = %response.status(), "SSE response received");

        Ok(EventSource::new(response))
    }
}
