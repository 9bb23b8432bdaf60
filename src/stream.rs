//! Pull-based reader over a chat completion event stream.
//!
//! [`EventStream`] wraps the body of an already-successful HTTP response and
//! turns its `data: ...` lines into decoded events, one per [`EventStream::next`]
//! call, until the `data: [DONE]` sentinel arrives or the body ends.
//!
//! # Example
//! ```ignore
//! let mut stream = client.create_chat_completion_stream(request, &cancel).await?;
//! loop {
//!     match stream.next().await? {
//!         Recv::Event(chunk) => print!("{}", chunk.content().unwrap_or_default()),
//!         Recv::End(_) => break,
//!     }
//! }
//! ```

use std::marker::PhantomData;
use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::ClientError;
use crate::model::StreamChatCompletionResponse;
use crate::sse::{classify_line, Frame, LineBuffer};

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send>>;

/// Reader over a streamed `/chat/completions` response.
pub type ChatCompletionStream = EventStream<StreamChatCompletionResponse>;

/// Outcome of a successful [`EventStream::next`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Recv<T> {
    /// One decoded event, in wire order.
    Event(T),
    /// No more events will be produced.
    End(StreamEnd),
}

/// Why a stream stopped producing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server sent `data: [DONE]`.
    Done,
    /// The body ended without the sentinel. Usually the provider dropped the
    /// connection mid-response.
    Eof,
    /// The reader was closed or its cancellation token fired.
    Closed,
    /// Reading the body failed. The error was returned by the call that hit it.
    Failed,
}

/// Line-framed JSON event reader with explicit lifecycle.
///
/// Once the reader has ended, every further `next()` returns the same
/// [`Recv::End`]. Decode errors are returned for that call only and leave the
/// reader usable, so a single corrupt line does not kill a long-running stream.
/// A body read error is returned once and ends the reader with
/// [`StreamEnd::Failed`].
///
/// Dropping the reader closes it.
pub struct EventStream<T> {
    body: Option<ByteStream>,
    buffer: LineBuffer,
    body_ended: bool,
    ended: Option<StreamEnd>,
    cancel: CancellationToken,
    _event: PhantomData<fn() -> T>,
}

impl<T> EventStream<T> {
    /// Wrap an open byte stream.
    ///
    /// The reader watches a child of `cancel`: cancelling the parent aborts a
    /// pending read, while [`close`](Self::close) only cancels the child.
    pub fn new<S, E>(body: S, cancel: &CancellationToken) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<ClientError>,
    {
        let body: ByteStream = Box::pin(body.map(|chunk| chunk.map_err(Into::<ClientError>::into)));
        Self {
            body: Some(body),
            buffer: LineBuffer::new(),
            body_ended: false,
            ended: None,
            cancel: cancel.child_token(),
            _event: PhantomData,
        }
    }

    /// Wrap the body of a response whose status has already been checked.
    pub fn from_response(response: reqwest::Response, cancel: &CancellationToken) -> Self {
        Self::new(response.bytes_stream(), cancel)
    }

    /// Release the body and cancel outstanding reads. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.ended.is_none() {
            self.ended = Some(StreamEnd::Closed);
        }
        self.release();
        self.cancel.cancel();
    }

    /// How the stream ended, or `None` while it is still live.
    pub fn end_reason(&self) -> Option<StreamEnd> {
        self.ended
    }

    pub fn is_terminated(&self) -> bool {
        self.ended.is_some()
    }

    fn finish(&mut self, end: StreamEnd) {
        self.ended = Some(end);
        self.release();
    }

    fn release(&mut self) {
        // Dropping the body hands the connection back to reqwest.
        self.body = None;
    }

    /// Read one more chunk into the line buffer, or note that the body ended.
    async fn fill(&mut self) -> Result<(), ClientError> {
        let chunk = {
            let Some(body) = self.body.as_mut() else {
                self.body_ended = true;
                return Ok(());
            };
            let cancel = &self.cancel;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                chunk = body.next() => chunk,
            }
        };

        match chunk {
            Some(Ok(bytes)) => {
                self.buffer.extend(&bytes);
                Ok(())
            }
            Some(Err(e)) => {
                self.finish(StreamEnd::Failed);
                Err(e)
            }
            None => {
                self.body_ended = true;
                Ok(())
            }
        }
    }
}

impl<T: DeserializeOwned> EventStream<T> {
    /// Advance to the next event.
    ///
    /// Returns `Err(ClientError::StreamCancelled)` once if the cancellation
    /// token fires, after which the reader is closed.
    pub async fn next(&mut self) -> Result<Recv<T>, ClientError> {
        loop {
            if let Some(end) = self.ended {
                return Ok(Recv::End(end));
            }
            if self.cancel.is_cancelled() {
                self.close();
                return Err(ClientError::StreamCancelled);
            }

            let line = match self.buffer.next_line() {
                Some(line) => line,
                None if self.body_ended => match self.buffer.take_remaining() {
                    Some(line) => line,
                    None => {
                        self.finish(StreamEnd::Eof);
                        continue;
                    }
                },
                None => {
                    self.fill().await?;
                    continue;
                }
            };

            if let Some(event) = self.decode(line)? {
                return Ok(Recv::Event(event));
            }
        }
    }

    /// Adapt the reader into a `Stream` that ends on the first [`Recv::End`].
    pub fn into_stream(self) -> impl Stream<Item = Result<T, ClientError>> + Send
    where
        T: Send,
    {
        stream::unfold(self, |mut reader| async move {
            match reader.next().await {
                Ok(Recv::Event(event)) => Some((Ok(event), reader)),
                Ok(Recv::End(_)) => None,
                Err(e) => Some((Err(e), reader)),
            }
        })
    }

    fn decode(&mut self, raw: Vec<u8>) -> Result<Option<T>, ClientError> {
        let line = String::from_utf8(raw).map_err(|e| ClientError::InvalidUtf8 {
            line: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
        })?;

        match classify_line(&line) {
            Frame::Noise => Ok(None),
            Frame::Done => {
                self.finish(StreamEnd::Done);
                Ok(None)
            }
            Frame::Data(payload) => serde_json::from_str(payload)
                .map(Some)
                .map_err(|source| ClientError::Decode {
                    line: line.trim().to_string(),
                    source,
                }),
        }
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Extension trait turning a `reqwest::Response` into an [`EventStream`].
///
/// # Example
/// ```ignore
/// use deepseek::stream::EventStreamExt;
///
/// let response = http.post(url).json(&body).send().await?;
/// let mut events = response.event_stream::<MyEvent>(&cancel);
/// ```
pub trait EventStreamExt {
    fn event_stream<T: DeserializeOwned>(self, cancel: &CancellationToken) -> EventStream<T>;
}

impl EventStreamExt for reqwest::Response {
    fn event_stream<T: DeserializeOwned>(self, cancel: &CancellationToken) -> EventStream<T> {
        EventStream::from_response(self, cancel)
    }
}
