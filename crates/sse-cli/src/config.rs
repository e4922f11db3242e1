//! Configuration file handling for ssecat

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sse_client::{ClientConfig, ContentTypePolicy};

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default stream URL
    pub url: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Require the exact `text/event-stream` content type
    pub exact: Option<bool>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("ssecat");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: Args<'_>) -> Result<MergedConfig> {
        let Some(url) = args.url.map(String::from).or_else(|| self.url.clone()) else {
            bail!("No URL given on the command line or in the config file");
        };

        let mut headers = self.headers.clone();
        for header in args.headers {
            let (name, value) = parse_header(header)?;
            headers.insert(name.to_string(), value.to_string());
        }

        Ok(MergedConfig {
            url,
            output: args
                .output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "text".to_string()),
            no_color: args.no_color || self.no_color.unwrap_or(false),
            exact: args.exact || self.exact.unwrap_or(false),
            timeout: args
                .timeout_secs
                .or(self.timeout_secs)
                .map(Duration::from_secs),
            headers,
        })
    }
}

/// Command-line values that override the config file
#[derive(Debug, Default)]
pub struct Args<'a> {
    pub url: Option<&'a str>,
    pub output: Option<&'a str>,
    pub no_color: bool,
    pub exact: bool,
    pub timeout_secs: Option<u64>,
    pub headers: &'a [String],
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub url: String,
    pub output: String,
    pub no_color: bool,
    pub exact: bool,
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
}

impl MergedConfig {
    /// Client configuration for the stream request
    ///
    /// The CLI is lenient about content types unless `exact` is set.
    pub fn client_config(&self) -> ClientConfig {
        let policy = if self.exact {
            ContentTypePolicy::Exact
        } else {
            ContentTypePolicy::Contains
        };

        let mut builder = ClientConfig::builder()
            .content_type_policy(policy)
            .user_agent(concat!("ssecat/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.build()
    }
}

/// Split a `Name: value` header argument
pub fn parse_header(header: &str) -> Result<(&str, &str)> {
    match header.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Invalid header '{}', expected 'Name: value'", header),
    }
}
