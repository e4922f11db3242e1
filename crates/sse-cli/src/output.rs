//! Output formatting for ssecat (text, json)

use clap::ValueEnum;
use colored::Colorize;
use sse_client::ServerSentEvent;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable blocks (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Parse a format name from the config file
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name, true).ok()
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print an info message to stderr (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg.dimmed());
        }
    }

    /// Print one event in the configured format
    pub fn print_event(&self, event: &ServerSentEvent) {
        println!("{}", format_event(event, self.format));
    }

    /// Print one raw line
    pub fn print_line(&self, line: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", line),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(line).unwrap_or_else(|_| "\"\"".to_string())
            ),
        }
    }
}

/// Render an event for display
pub fn format_event(event: &ServerSentEvent, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = format!("{} {}", "event:".bold(), event.event().cyan());
            if !event.id().is_empty() {
                out.push_str(&format!("\n{} {}", "id:".bold(), event.id()));
            }
            if let Some(retry) = event.retry() {
                out.push_str(&format!("\n{} {}", "retry:".bold(), retry));
            }
            for line in event.data().split('\n') {
                out.push_str(&format!("\n{} {}", "data:".bold(), line));
            }
            out.push('\n');
            out
        }
        OutputFormat::Json => {
            serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text() {
        colored::control::set_override(false);

        let event = ServerSentEvent::new("line one\nline two")
            .with_event("update")
            .with_id("42");
        assert_eq!(
            format_event(&event, OutputFormat::Text),
            "event: update\nid: 42\ndata: line one\ndata: line two\n"
        );

        let event = ServerSentEvent::new("").with_retry(Some(3000));
        assert_eq!(
            format_event(&event, OutputFormat::Text),
            "event: message\nretry: 3000\ndata: \n"
        );
    }

    #[test]
    fn test_format_json() {
        let event = ServerSentEvent::new("hi").with_id("1");
        let json: serde_json::Value =
            serde_json::from_str(&format_event(&event, OutputFormat::Json)).unwrap();

        assert_eq!(json["event"], "message");
        assert_eq!(json["data"], "hi");
        assert_eq!(json["id"], "1");
        assert!(json.get("retry").is_none());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_name("table"), None);
        assert_eq!(OutputFormat::Json.as_str(), "json");
    }
}
