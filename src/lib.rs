//! # deepseek - streaming chat completions client
//!
//! A thin async client for DeepSeek's API and OpenAI-compatible gateways such as
//! DashScope (Qwen, QwQ) and Ollama's `/v1` layer.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Pull-based reader over `data: ...` event streams with an explicit
//!   end-of-stream signal
//! - Cooperative cancellation through `tokio_util::sync::CancellationToken`
//! - Type-safe request/response models that keep absent and empty fields apart
//!
//! ## Architecture
//!
//! - [`Client`] builds and sends requests, and checks the response status.
//! - [`stream::EventStream`] owns the response body and yields
//!   [`stream::Recv::Event`] per `data:` line until [`stream::Recv::End`].
//! - [`sse`] holds the line framing rules shared by the reader.
//!
//! ## Example
//! ```no_run
//! use deepseek::model::{names, ChatCompletionMessage, StreamChatCompletionRequest};
//! use deepseek::stream::{Recv, StreamEnd};
//! use deepseek::Client;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("your-api-key")?;
//!     let request = StreamChatCompletionRequest::new(
//!         names::DEEPSEEK_CHAT,
//!         vec![ChatCompletionMessage::user("Hello!")],
//!     );
//!
//!     let cancel = CancellationToken::new();
//!     let mut stream = client.create_chat_completion_stream(request, &cancel).await?;
//!     loop {
//!         match stream.next().await? {
//!             Recv::Event(chunk) => print!("{}", chunk.content().unwrap_or_default()),
//!             Recv::End(end) => {
//!                 if end == StreamEnd::Eof {
//!                     eprintln!("\nconnection dropped before [DONE]");
//!                 }
//!                 break;
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{Client, ClientError};
pub use model::{ChatCompletionMessage, StreamChatCompletionRequest, StreamChatCompletionResponse};
pub use stream::{ChatCompletionStream, EventStream, Recv, StreamEnd};
