//! Server-Sent Events (SSE) framing used by chat completion streams.
//!
//! Every event the server pushes is a single line carrying a JSON payload:
//! ```text
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```
//!
//! Anything else (blank keep-alive lines, `:` comments, `event:` fields) is
//! framing noise and is skipped by the reader.

/// Literal prefix of an event frame.
pub const DATA_PREFIX: &str = "data: ";

/// How a single trimmed line of the stream should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// A `data: ` line; holds the JSON payload after the prefix.
    Data(&'a str),
    /// The `data: [DONE]` sentinel.
    Done,
    /// Blank lines, comments and any other non-data line.
    Noise,
}

/// Classify one line of the stream.
///
/// Surrounding whitespace (including the `\r` of CRLF framing) is trimmed first.
/// The sentinel check is an exact match on the whole trimmed line, so a payload
/// that merely contains `[DONE]` is still a normal event.
///
/// # Example
/// ```
/// use deepseek::sse::{classify_line, Frame};
///
/// assert_eq!(classify_line("data: [DONE]\r\n"), Frame::Done);
/// assert_eq!(classify_line("data: {\"id\":\"1\"}"), Frame::Data("{\"id\":\"1\"}"));
/// assert_eq!(classify_line(": keep-alive"), Frame::Noise);
/// ```
pub fn classify_line(line: &str) -> Frame<'_> {
    let line = line.trim();
    match line.strip_prefix(DATA_PREFIX) {
        Some(data) if is_done_marker(data) => Frame::Done,
        Some(data) => Frame::Data(data.trim()),
        None => Frame::Noise,
    }
}

/// Check if an SSE data payload is the end-of-stream marker.
///
/// # Example
/// ```
/// use deepseek::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker(""));
/// assert!(!is_done_marker("{\"data\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}

/// Accumulates raw body chunks and hands out complete lines.
///
/// Splitting happens on bytes rather than text so a multi-byte character
/// spread over two chunks is reassembled before decoding.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    // Prefix of `buf` already known to hold no `\n`.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk read from the body.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Remove and return the next line including its `\n`, if one is complete.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.buf.len();
            return None;
        };
        let pos = self.scanned + offset;
        self.scanned = 0;
        Some(self.buf.drain(..=pos).collect())
    }

    /// Remove and return whatever is left once the body has ended.
    pub fn take_remaining(&mut self) -> Option<Vec<u8>> {
        self.scanned = 0;
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}
