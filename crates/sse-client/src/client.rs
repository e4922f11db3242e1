//! Transport-level SSE client
//!
//! Wraps a [`reqwest::Client`] so that every request it sends disables
//! caching and every response it returns is known to be an event stream.

use reqwest::{Client, IntoUrl, Method, Request, RequestBuilder, Response};
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, ContentTypePolicy};
use crate::error::Result;
use crate::headers::{check_content_type, set_no_store, set_request_headers};
use crate::source::EventSource;

/// Content-type policy used by [`SseClient`] unless configured otherwise
pub const DEFAULT_CLIENT_POLICY: ContentTypePolicy = ContentTypePolicy::Exact;

/// Event-stream HTTP client
#[derive(Debug, Clone)]
pub struct SseClient {
    client: Client,
    policy: ContentTypePolicy,
}

impl SseClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            policy: config.content_type_policy.unwrap_or(DEFAULT_CLIENT_POLICY),
        })
    }

    /// Wrap an existing reqwest client (the parent transport)
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

    pub fn policy(&self) -> ContentTypePolicy {
        self.policy
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Start building a request; send it with [`SseClient::execute`]
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request and check that the response is an event stream
    ///
    /// `Cache-Control: no-store` is set on the request. A response with any
    /// other content type is dropped and reported as an error.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        set_no_store(request.headers_mut());

        let response = self.client.execute(request).await?;
        debug!(status = %response.status(), "SSE transport response");

        check_content_type(response.headers(), self.policy)?;
        Ok(response)
    }

    /// Open an event stream, sending the full set of event-stream headers
    ///
    /// The URL is parsed up front; a malformed one fails with
    /// [`SseError::InvalidUrl`](crate::SseError::InvalidUrl) before any request is sent.
    pub async fn connect(&self, method: Method, url: impl AsRef<str>) -> Result<EventSource> {
        let url = Url::parse(url.as_ref())?;
        let mut request = self.client.request(method, url).build()?;
        set_request_headers(request.headers_mut());

        let response = self.execute(request).await?;
        Ok(EventSource::with_policy(response, self.policy))
    }

    /// Open an event stream with `GET`
    pub async fn get(&self, url: impl AsRef<str>) -> Result<EventSource> {
        self.connect(Method::GET, url).await
    }
}
