//! Incremental line splitting
//!
//! Event streams only recognise `\r\n`, a bare `\r` and a bare `\n` as line
//! terminators. Unicode separators (U+2028, U+2029, U+0085) are ordinary
//! characters and stay inside the line.

use std::borrow::Cow;

const CR: char = '\r';
const LF: char = '\n';

/// Split `text` on `\r\n`, `\r` or `\n`.
///
/// A terminator at the very end does not produce a trailing empty line, so
/// `"line1\n"` yields `["line1"]` while `"\n\r\n\r"` yields three empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    // Terminators are ASCII, so byte offsets always land on char boundaries.
    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => {
                lines.push(text[start..pos].to_string());
                pos += 1;
                start = pos;
            }
            b'\r' => {
                lines.push(text[start..pos].to_string());
                pos += if bytes.get(pos + 1) == Some(&b'\n') { 2 } else { 1 };
                start = pos;
            }
            _ => pos += 1,
        }
    }

    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }

    lines
}

/// Turns arbitrarily fragmented text chunks into complete lines
///
/// One splitter serves exactly one stream. Feed chunks in arrival order with
/// [`LineSplitter::feed`], then call [`LineSplitter::flush`] once the source
/// is exhausted to recover a final unterminated line.
#[derive(Debug, Default)]
pub struct LineSplitter {
    /// Pieces of the current line that have not seen a terminator yet
    pending_fragments: Vec<String>,
    /// The previous chunk ended in `\r`; it may still pair with a leading `\n`
    pending_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk and collect every line it completes
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        let mut text = Cow::Borrowed(chunk);

        if std::mem::take(&mut self.pending_cr) {
            text = Cow::Owned(format!("{CR}{chunk}"));
        }

        if text.ends_with(CR) {
            self.pending_cr = true;
            text = match text {
                Cow::Borrowed(s) => Cow::Borrowed(&s[..s.len() - 1]),
                Cow::Owned(mut s) => {
                    s.pop();
                    Cow::Owned(s)
                }
            };
        }

        if text.is_empty() {
            return Vec::new();
        }

        let terminated = text.ends_with([CR, LF]);
        let mut lines = split_lines(&text);

        if lines.len() == 1 && !terminated {
            self.pending_fragments.append(&mut lines);
            return Vec::new();
        }

        if !self.pending_fragments.is_empty() {
            let mut head = self.pending_fragments.concat();
            self.pending_fragments.clear();
            head.push_str(&lines[0]);
            lines[0] = head;
        }

        if !terminated {
            if let Some(tail) = lines.pop() {
                self.pending_fragments.push(tail);
            }
        }

        lines
    }

    /// Whether any partial line or undecided `\r` is buffered
    pub fn has_pending(&self) -> bool {
        self.pending_cr || !self.pending_fragments.is_empty()
    }

    /// End of input: emit whatever is still buffered as a final line
    ///
    /// A lone trailing `\r` with nothing buffered flushes as an empty line.
    pub fn flush(self) -> Option<String> {
        if !self.has_pending() {
            return None;
        }
        Some(self.pending_fragments.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&str]) -> Vec<String> {
        let mut splitter = LineSplitter::new();
        let mut lines = Vec::new();
        for chunk in chunks {
            lines.extend(splitter.feed(chunk));
        }
        lines.extend(splitter.flush());
        lines
    }

    #[test]
    fn test_split_crlf() {
        assert_eq!(
            split_lines("line1\r\nline2\r\nline3"),
            vec!["line1", "line2", "line3"]
        );
    }

    #[test]
    fn test_split_cr() {
        assert_eq!(
            split_lines("line1\rline2\rline3"),
            vec!["line1", "line2", "line3"]
        );
    }

    #[test]
    fn test_split_mixed_endings() {
        assert_eq!(
            split_lines("line1\r\nline2\nline3\rline4"),
            vec!["line1", "line2", "line3", "line4"]
        );
        assert_eq!(split_lines("line1\n\nline3"), vec!["line1", "", "line3"]);
    }

    #[test]
    fn test_split_unicode_separators_are_content() {
        for text in ["line1\u{2028}line2", "line1\u{2029}line2", "line1\u{0085}line2"] {
            assert_eq!(split_lines(text), vec![text]);
        }
    }

    #[test]
    fn test_split_edges() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n\r\n\r"), vec!["", "", ""]);
        assert_eq!(split_lines("line1\n"), vec!["line1"]);
    }

    #[test]
    fn test_basic_lines() {
        assert_eq!(decode_chunks(&["line1\nline2\n"]), vec!["line1", "line2"]);
    }

    #[test]
    fn test_incremental() {
        assert_eq!(
            decode_chunks(&["partial", " line\n", "another\n"]),
            vec!["partial line", "another"]
        );
        assert_eq!(
            decode_chunks(&["par", "tial", " line\ncomp", "lete\n"]),
            vec!["partial line", "complete"]
        );
    }

    #[test]
    fn test_crlf_across_chunks() {
        assert_eq!(decode_chunks(&["a\r", "\nb"]), vec!["a", "b"]);
        assert_eq!(
            decode_chunks(&["line1\r", "\nline2", "\n"]),
            vec!["line1", "line2"]
        );
    }

    #[test]
    fn test_consecutive_cr() {
        assert_eq!(
            decode_chunks(&["line1\r\rline2\n"]),
            vec!["line1", "", "line2"]
        );
        assert_eq!(decode_chunks(&["\r", "\r"]), vec!["", ""]);
    }

    #[test]
    fn test_only_terminators() {
        assert_eq!(decode_chunks(&["\n\n\n"]), vec!["", "", ""]);
        assert_eq!(decode_chunks(&["\r\n\r\n"]), vec!["", ""]);
        assert_eq!(decode_chunks(&["\n"]), vec![""]);
    }

    #[test]
    fn test_flush_recovers_partial_line() {
        assert_eq!(decode_chunks(&["line1\npartial"]), vec!["line1", "partial"]);
        assert_eq!(decode_chunks(&["buffered"]), vec!["buffered"]);
        assert_eq!(decode_chunks(&["buffered", "\n"]), vec!["buffered"]);
    }

    #[test]
    fn test_flush_trailing_cr() {
        assert_eq!(decode_chunks(&["text\r"]), vec!["text"]);

        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("a\n"), vec!["a"]);
        assert!(splitter.feed("\r").is_empty());
        assert_eq!(splitter.flush(), Some(String::new()));
    }

    #[test]
    fn test_flush_nothing_pending() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("line1\n"), vec!["line1"]);
        assert!(!splitter.has_pending());
        assert_eq!(splitter.flush(), None);

        assert!(decode_chunks(&[]).is_empty());
    }

    #[test]
    fn test_empty_chunks_ignored() {
        assert_eq!(
            decode_chunks(&["", "line1\n", "", "line2\n", ""]),
            vec!["line1", "line2"]
        );
    }

    #[test]
    fn test_single_char_chunks() {
        assert_eq!(
            decode_chunks(&["h", "e", "l", "l", "o", "\n", "w", "o", "r", "l", "d"]),
            vec!["hello", "world"]
        );
        assert_eq!(
            decode_chunks(&["l", "i", "n", "e", "1", "\r", "\n", "l", "i", "n", "e", "2"]),
            vec!["line1", "line2"]
        );
    }

    #[test]
    fn test_unicode_separators_preserved() {
        assert_eq!(
            decode_chunks(&["data\u{2028}field\nline2\u{2029}end\n"]),
            vec!["data\u{2028}field", "line2\u{2029}end"]
        );
        assert_eq!(
            decode_chunks(&["line1\u{2028}line2\n"]),
            vec!["line1\u{2028}line2"]
        );
    }

    #[test]
    fn test_complex_mixed_scenario() {
        let chunks = [
            "first",
            " line\r",
            "\nsecond",
            " line\r\n",
            "third\rfo",
            "urth\n",
            "fifth",
        ];
        assert_eq!(
            decode_chunks(&chunks),
            vec!["first line", "second line", "third", "fourth", "fifth"]
        );
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let inputs = [
            "a\r\nb\rc\nd",
            "\r\r\n\n\r",
            "event: x\r\ndata: \u{2028}y\r\n\r\n: c\rdata:z\n",
            "line\u{0085}one\r",
            "héllo\r\nwörld\n",
        ];

        for input in inputs {
            let expected = decode_chunks(&[input]);
            let boundaries: Vec<usize> = input.char_indices().map(|(i, _)| i).skip(1).collect();

            // Every single split point
            for &at in &boundaries {
                let (left, right) = input.split_at(at);
                assert_eq!(decode_chunks(&[left, right]), expected, "split at {at} of {input:?}");
            }

            // Every pair of split points
            for (n, &a) in boundaries.iter().enumerate() {
                for &b in &boundaries[n + 1..] {
                    let parts = [&input[..a], &input[a..b], &input[b..]];
                    assert_eq!(decode_chunks(&parts), expected, "split at {a},{b} of {input:?}");
                }
            }

            // One char per chunk
            let chars: Vec<String> = input.chars().map(String::from).collect();
            let refs: Vec<&str> = chars.iter().map(String::as_str).collect();
            assert_eq!(decode_chunks(&refs), expected, "char chunks of {input:?}");
        }
    }
}
