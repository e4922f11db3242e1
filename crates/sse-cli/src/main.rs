//! ssecat - print Server-Sent Events from a URL
//!
//! Connects to an event stream and prints each event as it arrives.

mod config;
mod output;
mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sse_client::Method;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Args, Config};
use crate::output::{OutputContext, OutputFormat};
use crate::watch::WatchOptions;

#[derive(Parser)]
#[command(name = "ssecat")]
#[command(author, version, about = "Print Server-Sent Events from a URL")]
struct Cli {
    /// Event stream URL
    #[arg(env = "SSECAT_URL")]
    url: Option<String>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra request header, `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Configuration file path
    #[arg(short, long, env = "SSECAT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Stop after this many events
    #[arg(short = 'n', long)]
    max_events: Option<usize>,

    /// Print logical lines instead of decoded events
    #[arg(long)]
    lines: bool,

    /// Require the Content-Type to be exactly text/event-stream
    #[arg(long)]
    exact: bool,

    /// Request timeout in seconds (bounds the whole stream)
    #[arg(long, env = "SSECAT_TIMEOUT")]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(Args {
        url: cli.url.as_deref(),
        output: cli.output.map(|format| format.as_str()),
        no_color: cli.no_color,
        exact: cli.exact,
        timeout_secs: cli.timeout,
        headers: &cli.headers,
    })?;
    debug!(?merged, "Resolved configuration");

    let format = OutputFormat::from_name(&merged.output)
        .with_context(|| format!("Unknown output format '{}'", merged.output))?;
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);

    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", cli.method))?;

    let options = WatchOptions {
        max_events: cli.max_events,
        raw_lines: cli.lines,
    };

    watch::watch(&merged, method, options, &ctx).await
}
