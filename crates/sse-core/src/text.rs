//! Incremental UTF-8 decoding of response body bytes
//!
//! Body chunks can split a multi-byte character anywhere. The incomplete tail
//! of one chunk is held back and completed by the next one; invalid sequences
//! are replaced with U+FFFD rather than failing the stream.

const BOM: char = '\u{FEFF}';

/// Stateful bytes-to-text decoder for one response body
#[derive(Debug, Default)]
pub struct TextDecoder {
    /// Trailing bytes of an incomplete character from the previous chunk
    incomplete: Vec<u8>,
    /// Any text has been produced yet (a leading BOM is only stripped once)
    started: bool,
}

impl TextDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, holding back an incomplete trailing character
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.incomplete);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.incomplete = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        self.strip_bom(out)
    }

    /// End of body: a dangling partial character becomes U+FFFD
    pub fn finish(&mut self) -> Option<String> {
        if self.incomplete.is_empty() {
            return None;
        }
        self.incomplete.clear();
        Some(self.strip_bom(char::REPLACEMENT_CHARACTER.to_string()))
    }

    fn strip_bom(&mut self, text: String) -> String {
        if self.started || text.is_empty() {
            return text;
        }
        self.started = true;
        match text.strip_prefix(BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        }
    }
}
