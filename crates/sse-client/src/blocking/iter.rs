//! Blocking iterators over any `std::io::Read` body

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use sse_core::{ChunkDecoder, EventParser, LineParser};

use crate::error::Result;

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Iterator of events read from a blocking body
pub type EventIter<R> = DecodedIter<R, EventParser>;

/// Iterator of logical lines read from a blocking body
pub type LineIter<R> = DecodedIter<R, LineParser>;

/// Drives a [`ChunkDecoder`] from a reader
///
/// Each `read` call is one chunk; a zero-length read is the end of the body.
/// An IO error is yielded once and ends the iteration.
pub struct DecodedIter<R, D: ChunkDecoder> {
    reader: R,
    decoder: D,
    pending: VecDeque<D::Output>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read, D: ChunkDecoder + Default> DecodedIter<R, D> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: D::default(),
            pending: VecDeque::new(),
            buf: vec![0; READ_BUFFER_SIZE],
            done: false,
        }
    }

    /// Give back the reader, dropping anything not yet decoded
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> DecodedIter<R, EventParser> {
    /// Id of the most recent accepted `id:` field seen so far
    pub fn last_event_id(&self) -> &str {
        self.decoder.last_event_id()
    }
}

impl<R: Read, D: ChunkDecoder> Iterator for DecodedIter<R, D> {
    type Item = Result<D::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }

            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    let decoded = self.decoder.finish();
                    self.pending.extend(decoded);
                }
                Ok(n) => {
                    let decoded = self.decoder.decode_chunk(&self.buf[..n]);
                    self.pending.extend(decoded);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}
