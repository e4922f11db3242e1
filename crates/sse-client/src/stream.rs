//! Async adapters from body byte streams to lines and events

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;
use sse_core::{ChunkDecoder, EventParser, LineParser};

use crate::error::{Result, SseError};

/// Boxed response body, as produced by `reqwest::Response::bytes_stream`
pub type BodyStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send>>;

/// Stream of [`ServerSentEvent`](sse_core::ServerSentEvent)s decoded from a body stream
pub type EventStream<S = BodyStream> = DecodedStream<S, EventParser>;

/// Stream of logical lines decoded from a body stream
pub type LineStream<S = BodyStream> = DecodedStream<S, LineParser>;

/// Drives a [`ChunkDecoder`] from any stream of byte chunks
///
/// The inner stream is only polled when no decoded item is buffered. Once the
/// inner stream ends the decoder is flushed and the stream terminates. A
/// transport error is yielded once and ends the stream; the incomplete block
/// is discarded. Dropping the stream drops the body and releases the
/// connection.
pub struct DecodedStream<S, D: ChunkDecoder> {
    inner: S,
    decoder: D,
    pending: VecDeque<D::Output>,
    done: bool,
}

impl<S, D: ChunkDecoder> std::fmt::Debug for DecodedStream<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedStream")
            .field("pending", &self.pending.len())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<S, D: ChunkDecoder + Default> DecodedStream<S, D> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            decoder: D::default(),
            pending: VecDeque::new(),
            done: false,
        }
    }
}

impl<S> DecodedStream<S, EventParser> {
    /// Id of the most recent accepted `id:` field seen so far
    pub fn last_event_id(&self) -> &str {
        self.decoder.last_event_id()
    }
}

impl<S, E, D> Stream for DecodedStream<S, D>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<SseError>,
    D: ChunkDecoder + Unpin,
    D::Output: Unpin,
{
    type Item = Result<D::Output>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(item) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }
            if this.done {
                return Poll::Ready(None);
            }

            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(bytes)) => {
                    let decoded = this.decoder.decode_chunk(&bytes);
                    this.pending.extend(decoded);
                }
                Some(Err(err)) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err.into())));
                }
                None => {
                    this.done = true;
                    let decoded = this.decoder.finish();
                    this.pending.extend(decoded);
                }
            }
        }
    }
}

/// Decode events from an arbitrary byte stream
pub fn events<S>(inner: S) -> EventStream<S> {
    EventStream::new(inner)
}

/// Decode logical lines from an arbitrary byte stream
pub fn lines<S>(inner: S) -> LineStream<S> {
    LineStream::new(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::{self, StreamExt, TryStreamExt};
    use sse_core::ServerSentEvent;

    async fn collect_events<S>(stream: EventStream<S>) -> Result<Vec<ServerSentEvent>>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Unpin,
    {
        stream.try_collect().await
    }

    fn body(chunks: &[&'static str]) -> impl Stream<Item = std::io::Result<Bytes>> + Unpin {
        stream::iter(
            chunks
                .iter()
                .map(|&chunk| Ok(Bytes::from_static(chunk.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_whatwg_example() {
        let events = collect_events(events(body(&[
            "data: YH00\n",
            "data: +2\n",
            "data: 10\n",
            "\n",
        ])))
        .await
        .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event(), "message");
        assert_eq!(events[0].data(), "YH00\n+2\n10");
        assert_eq!(events[0].id(), "");
        assert_eq!(events[0].retry(), None);
    }

    #[tokio::test]
    async fn test_lines_with_flush() {
        let lines: Vec<String> = lines(body(&["line1\nno_newline"]))
            .map(|line| line.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["line1", "no_newline"]);
    }

    #[tokio::test]
    async fn test_last_event_id_tracked() {
        let mut stream = events(body(&["id: 7\ndata: a\n\n", "data: b\n\n"]));

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id(), "7");
        assert_eq!(stream.last_event_id(), "7");

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.id(), "7");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: a\n\ndata: partial\n")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from_static(b"\n")),
        ];
        let mut stream = events(stream::iter(chunks));

        assert_eq!(stream.next().await.unwrap().unwrap().data(), "a");
        assert!(matches!(stream.next().await, Some(Err(SseError::Io(_)))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_body() {
        let events = collect_events(events(body(&[]))).await.unwrap();
        assert!(events.is_empty());
    }
}
