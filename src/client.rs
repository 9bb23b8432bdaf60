//! Client and error types.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::http::{add_default_headers, build_http_client};
use crate::model::StreamChatCompletionRequest;
use crate::options::{SecretString, TransportOptions};
use crate::stream::{ChatCompletionStream, EventStreamExt};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Environment variable read by [`Client::from_env`] for the API key.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Optional environment override for the base URL.
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A `data:` line whose payload is not a valid event.
    #[error("failed to decode stream event `{line}`: {source}")]
    Decode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stream line is not valid UTF-8: `{line}`")]
    InvalidUtf8 { line: String },

    /// Non-success status; the body carried an error payload instead of events.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Stream cancelled")]
    StreamCancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client for DeepSeek and OpenAI-compatible chat completion endpoints.
///
/// The underlying `reqwest::Client` is built once and reused for every request.
///
/// # Example
/// ```no_run
/// use deepseek::model::{names, ChatCompletionMessage, StreamChatCompletionRequest};
/// use deepseek::stream::Recv;
/// use deepseek::Client;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), deepseek::ClientError> {
/// let client = Client::from_env()?;
/// let request = StreamChatCompletionRequest::new(
///     names::DEEPSEEK_CHAT,
///     vec![ChatCompletionMessage::user("Hello!")],
/// );
///
/// let cancel = CancellationToken::new();
/// let mut stream = client.create_chat_completion_stream(request, &cancel).await?;
/// while let Recv::Event(chunk) = stream.next().await? {
///     print!("{}", chunk.content().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    options: TransportOptions,
}

impl Client {
    /// Client for DeepSeek's API with default transport options.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, ClientError> {
        Self::with_options(TransportOptions::new(api_key))
    }

    pub fn with_options(options: TransportOptions) -> Result<Self, ClientError> {
        let http = build_http_client(&options)?;
        Ok(Self { http, options })
    }

    /// Build a client from `DEEPSEEK_API_KEY` and, if set, `DEEPSEEK_BASE_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ClientError::Config(format!("{} is not set", API_KEY_ENV)))?;

        let mut options = TransportOptions::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            options = options.with_base_url(base_url);
        }
        Self::with_options(options)
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// POST `body` as JSON to `path` under the base URL.
    ///
    /// Returns the response only when its status is a success; otherwise the
    /// body is read and turned into [`ClientError::Api`]. Cancelling `cancel`
    /// while the request is in flight aborts it.
    pub async fn post_json<B>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.options.base_url, path);
        let request = add_default_headers(self.http.post(&url), &self.options).json(body);

        debug!(%url, "sending request");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::StreamCancelled),
            response = request.send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::StreamCancelled),
                body = response.text() => body,
            };
            let body = match body {
                Ok(body) => body,
                Err(e) => {
                    warn!(%status, %url, error = %e, "failed to read error body");
                    format!("<failed to read error body: {}>", e)
                }
            };
            warn!(%status, %url, "request rejected");
            return Err(Self::handle_error_response(status, &body));
        }

        Ok(response)
    }

    /// Open a streamed chat completion.
    ///
    /// `request.stream` is forced to `true`. The returned reader watches a child
    /// of `cancel`, so cancelling it aborts both the request and later reads.
    pub async fn create_chat_completion_stream(
        &self,
        mut request: StreamChatCompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletionStream, ClientError> {
        request.stream = true;
        let response = self.post_json(CHAT_COMPLETIONS_PATH, &request, cancel).await?;

        debug!(model = %request.model, "chat completion stream opened");
        Ok(response.event_stream(cancel))
    }

    /// Handle OpenAI-style error responses.
    fn handle_error_response(status: StatusCode, body: &str) -> ClientError {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse {
                error: ErrorBody {
                    message,
                    error_type: Some(error_type),
                },
            }) => format!("{} ({})", message, error_type),
            Ok(ErrorResponse { error }) => error.message,
            Err(_) => body.to_string(),
        };
        ClientError::Api { status, message }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}
