//! Blocking event sources and transport client

use reqwest::blocking::{Client, Request, RequestBuilder, Response};
use reqwest::{IntoUrl, Method};
use tracing::{debug, instrument};
use url::Url;

use super::iter::{EventIter, LineIter};
use crate::client::DEFAULT_CLIENT_POLICY;
use crate::config::{ClientConfig, ContentTypePolicy};
use crate::error::Result;
use crate::headers::{check_content_type, set_no_store, set_request_headers};
use crate::source::DEFAULT_SOURCE_POLICY;

/// A blocking response expected to carry an event stream
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

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    pub fn check_content_type(&self) -> Result<()> {
        check_content_type(self.response.headers(), self.policy)
    }

    /// Consume the body as an iterator of events
    pub fn events(self) -> Result<EventIter<Response>> {
        self.check_content_type()?;
        Ok(EventIter::new(self.response))
    }

    /// Consume the body as an iterator of logical lines
    pub fn lines(self) -> Result<LineIter<Response>> {
        self.check_content_type()?;
        Ok(LineIter::new(self.response))
    }
}

/// Open an event stream with a blocking `client`
pub fn connect_sse(client: &Client, method: Method, url: impl IntoUrl) -> Result<EventSource> {
    client.request(method, url).connect_sse()
}

/// Event-stream helpers on [`reqwest::blocking::RequestBuilder`]
pub trait SseRequestExt: Sized {
    /// Add the event-stream request headers, replacing existing values
    fn sse_headers(self) -> Self;

    /// Send the request with event-stream headers and wrap the response
    fn connect_sse(self) -> Result<EventSource>;
}

impl SseRequestExt for RequestBuilder {
    fn sse_headers(self) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        set_request_headers(&mut headers);
        self.headers(headers)
    }

    #[instrument(skip(self))]
    fn connect_sse(self) -> Result<EventSource> {
        let (client, request) = self.build_split();
        let mut request = request?;
        set_request_headers(request.headers_mut());

        debug!(method = %request.method(), url = %request.url(), "Connecting to SSE stream");
        let response = client.execute(request)?;
        debug!(status = %response.status(), "SSE response received");

        Ok(EventSource::new(response))
    }
}

/// Blocking counterpart of [`crate::SseClient`]
#[derive(Debug, Clone)]
pub struct SseClient {
    client: Client,
    policy: ContentTypePolicy,
}

impl SseClient {
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_blocking_client()?,
            policy: config.content_type_policy.unwrap_or(DEFAULT_CLIENT_POLICY),
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            policy: DEFAULT_CLIENT_POLICY,
        }
    }

    pub fn with_policy(mut self, policy: ContentTypePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request with `Cache-Control: no-store` and check the response
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub fn execute(&self, mut request: Request) -> Result<Response> {
        set_no_store(request.headers_mut());

        let response = self.client.execute(request)?;
        debug!(status = %response.status(), "SSE transport response");

        check_content_type(response.headers(), self.policy)?;
        Ok(response)
    }

    /// Open an event stream; a malformed URL fails before any request is sent
    pub fn connect(&self, method: Method, url: impl AsRef<str>) -> Result<EventSource> {
        let url = Url::parse(url.as_ref())?;
        let mut request = self.client.request(method, url).build()?;
        set_request_headers(request.headers_mut());

        let response = self.execute(request)?;
        Ok(EventSource::with_policy(response, self.policy))
    }

    pub fn get(&self, url: impl AsRef<str>) -> Result<EventSource> {
        self.connect(Method::GET, url)
    }
}
