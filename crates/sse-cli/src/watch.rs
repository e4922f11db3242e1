//! Watch command - print a live event stream

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use sse_client::{EventSource, Method, SseClient};

use crate::config::MergedConfig;
use crate::output::OutputContext;

/// What to print from the stream
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub max_events: Option<usize>,
    pub raw_lines: bool,
}

/// Connect to the configured URL and print items until the stream ends,
/// `max_events` are printed or Ctrl+C is pressed
pub async fn watch(
    config: &MergedConfig,
    method: Method,
    options: WatchOptions,
    ctx: &OutputContext,
) -> Result<()> {
    let client = SseClient::with_config(&config.client_config())
        .context("Failed to create SSE client")?;

    ctx.info(&format!("Connecting to {}...", config.url));
    let source = client
        .connect(method, config.url.as_str())
        .await
        .with_context(|| format!("Failed to open event stream at {}", config.url))?;
    ctx.info("Press Ctrl+C to stop");

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let printed = if options.raw_lines {
        let lines = source.lines()?;
        pump(lines, options.max_events, &running, ctx, |line| {
            ctx.print_line(&line)
        })
        .await?
    } else {
        print_events(source, options.max_events, &running, ctx).await?
    };

    ctx.info(&format!("\n{} item(s) received", printed));
    Ok(())
}

async fn print_events(
    source: EventSource,
    max_events: Option<usize>,
    running: &AtomicBool,
    ctx: &OutputContext,
) -> Result<usize> {
    let events = source.events()?;
    pump(events, max_events, running, ctx, |event| ctx.print_event(&event)).await
}

/// Drain `stream` into `print`, returning how many items were printed
async fn pump<S, T>(
    mut stream: S,
    max_items: Option<usize>,
    running: &AtomicBool,
    ctx: &OutputContext,
    mut print: impl FnMut(T),
) -> Result<usize>
where
    S: Stream<Item = sse_client::Result<T>> + Unpin,
{
    let mut printed = 0;

    while running.load(Ordering::SeqCst) {
        if max_items.is_some_and(|max| printed >= max) {
            break;
        }

        tokio::select! {
            item = stream.next() => {
                match item {
                    Some(Ok(item)) => {
                        print(item);
                        printed += 1;
                    }
                    Some(Err(e)) => {
                        return Err(anyhow::Error::new(e).context("Stream error"));
                    }
                    None => {
                        ctx.info("Stream ended");
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                // Check running flag periodically
            }
        }
    }

    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use futures::stream;

    fn quiet_ctx() -> OutputContext {
        OutputContext::new(OutputFormat::Text, true, true)
    }

    #[tokio::test]
    async fn test_pump_stops_at_max_items() {
        let items = stream::iter((0..10).map(Ok::<_, sse_client::SseError>));
        let running = AtomicBool::new(true);
        let mut seen = Vec::new();

        let printed = pump(items, Some(3), &running, &quiet_ctx(), |i| seen.push(i))
            .await
            .unwrap();

        assert_eq!(printed, 3);
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_pump_drains_until_end() {
        let items = stream::iter((0..4).map(Ok::<_, sse_client::SseError>));
        let running = AtomicBool::new(true);

        let printed = pump(items, None, &running, &quiet_ctx(), |_| {})
            .await
            .unwrap();
        assert_eq!(printed, 4);
    }

    #[tokio::test]
    async fn test_pump_stops_when_interrupted() {
        let items = stream::iter((0..4).map(Ok::<_, sse_client::SseError>));
        let running = AtomicBool::new(false);

        let printed = pump(items, None, &running, &quiet_ctx(), |_| {})
            .await
            .unwrap();
        assert_eq!(printed, 0);
    }

    #[tokio::test]
    async fn test_pump_propagates_stream_error() {
        let items = stream::iter(vec![
            Ok(1),
            Err(sse_client::SseError::Io(std::io::Error::other("reset"))),
        ]);
        let running = AtomicBool::new(true);

        let result = pump(items, None, &running, &quiet_ctx(), |_| {}).await;
        assert!(result.is_err());
    }
}
