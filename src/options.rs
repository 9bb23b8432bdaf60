//! Transport configuration for [`Client`](crate::client::Client).

use std::collections::HashMap;
use std::time::Duration;

/// DeepSeek's public API.
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

/// Alibaba Cloud DashScope in OpenAI-compatible mode (Qwen, QwQ).
pub const DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Local Ollama server through its OpenAI-compatible layer.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Longest silence tolerated between two reads of a response.
///
/// Only the idle gap is bounded, so a stream that keeps producing chunks can
/// run for as long as the model keeps generating.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// HTTP transport options.
///
/// # Example
/// ```rust
/// use deepseek::options::{TransportOptions, DASHSCOPE_BASE_URL};
/// use std::time::Duration;
///
/// let options = TransportOptions::new("sk-...")
///     .with_base_url(DASHSCOPE_BASE_URL)
///     .with_read_timeout(Duration::from_secs(300));
/// assert_eq!(options.base_url, DASHSCOPE_BASE_URL);
/// assert_eq!(options.timeout, None);
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Sent as a bearer token. Left out entirely when `None` (local Ollama).
    pub api_key: Option<SecretString>,

    /// Base URL that endpoint paths such as `/chat/completions` are appended to.
    pub base_url: String,

    /// Deadline for the whole request including the streamed body. Unset by
    /// default.
    pub timeout: Option<Duration>,

    /// Idle timeout between reads; `None` disables it.
    pub read_timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEEPSEEK_BASE_URL.to_string(),
            timeout: None,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            proxy: None,
            extra_headers: None,
        }
    }
}

impl TransportOptions {
    /// Create new transport options with an API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the base URL. A trailing `/` is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set a deadline for the whole request, body included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the idle timeout between reads.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = Some(read_timeout);
        self
    }

    /// Disable both the request deadline and the idle timeout.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self.read_timeout = None;
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}
