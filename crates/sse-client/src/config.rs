//! Client configuration with YAML/TOML/JSON support

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SseError};
use crate::headers::EVENT_STREAM_MIME;

/// How a response `Content-Type` is matched against `text/event-stream`
///
/// Parameters after `;` are ignored in both modes and the comparison is
/// ASCII case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTypePolicy {
    /// Media type must equal `text/event-stream`
    Exact,
    /// Media type must contain `text/event-stream` (tolerates lists such as
    /// `application/json, text/event-stream`)
    Contains,
}

impl ContentTypePolicy {
    /// Check a raw `Content-Type` header value
    pub fn matches(&self, content_type: &str) -> bool {
        let media_type = media_type(content_type).to_ascii_lowercase();
        match self {
            Self::Exact => media_type == EVENT_STREAM_MIME,
            Self::Contains => media_type.contains(EVENT_STREAM_MIME),
        }
    }
}

impl fmt::Display for ContentTypePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("to be"),
            Self::Contains => f.write_str("to contain"),
        }
    }
}

/// The part of a `Content-Type` value before any `;` parameter
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(media_type, _)| media_type)
        .trim()
}

/// SSE client configuration
///
/// Can be loaded from YAML, TOML, JSON or constructed with
/// [`ClientConfig::builder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Total request timeout in milliseconds
    ///
    /// Covers reading the whole body, so it also bounds how long a stream may
    /// stay open. Unset by default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Content-type matching; each entry point has its own default when unset
    #[serde(default)]
    pub content_type_policy: Option<ContentTypePolicy>,

    /// User-Agent header value
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_connect_timeout() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            connect_timeout_ms: default_connect_timeout(),
            content_type_policy: None,
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file, picking the format by extension
    ///
    /// `.yaml`/`.yml`, `.toml` and `.json` are recognised.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(toml: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> std::result::Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Convert the configured headers into a header map
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SseError::invalid_header(name, e))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| SseError::invalid_header(name, e))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    /// Build an async reqwest client from this configuration
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout())
            .default_headers(self.header_map()?);

        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(builder.build()?)
    }

    /// Build a blocking reqwest client from this configuration
    #[cfg(feature = "blocking")]
    pub fn build_blocking_client(&self) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .connect_timeout(self.connect_timeout())
            .default_headers(self.header_map()?)
            // Blocking clients default to a 30s total timeout
            .timeout(self.timeout());

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(builder.build()?)
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = duration_ms(timeout);
        self
    }

    pub fn content_type_policy(mut self, policy: ContentTypePolicy) -> Self {
        self.config.content_type_policy = Some(policy);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
}
