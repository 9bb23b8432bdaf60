//! Request and response types for streamed chat completions.
//!
//! The shapes follow the OpenAI-compatible `/chat/completions` endpoint as served
//! by DeepSeek, DashScope (Qwen/QwQ) and Ollama's `/v1` compatibility layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known model identifiers.
pub mod names {
    pub const DEEPSEEK_CHAT: &str = "deepseek-chat";
    pub const DEEPSEEK_REASONER: &str = "deepseek-reasoner";

    pub const QWEN3_235B_A22B: &str = "qwen3-235b-a22b";
    pub const QWEN3_32B: &str = "qwen3-32b";
    pub const QWEN3_30B_A3B: &str = "qwen3-30b-a3b";
    pub const QWEN3_14B: &str = "qwen3-14b";
    pub const QWEN3_8B: &str = "qwen3-8b";
    pub const QWEN3_4B: &str = "qwen3-4b";
    pub const QWEN3_1_7B: &str = "qwen3-1.7b";
    pub const QWEN3_0_6B: &str = "qwen3-0.6b";

    /// Ollama tag.
    pub const QWEN2_5_7B: &str = "qwen2.5:7b";

    pub const QWQ_PLUS: &str = "qwq-plus";
    pub const QWQ_PLUS_LATEST: &str = "qwq-plus-latest";
    pub const QWQ_32B: &str = "qwq-32b";
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in the conversation sent with a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionMessage {
    pub role: ChatMessageRole,
    pub content: String,

    /// Id of the tool call this message answers (role `tool` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls previously issued by the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatCompletionMessage {
    pub fn new(role: ChatMessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatMessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatMessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatMessageRole::Assistant, content)
    }

    /// Result of a tool invocation, linked back to the call by id.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(ChatMessageRole::Tool, content)
        }
    }
}

/// Tool made available to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: Function,
}

impl Tool {
    pub fn function(function: Function) -> Self {
        Self {
            tool_type: "function".to_string(),
            function,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Function {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// JSON schema describing a function's arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseFormat {
    /// `"text"` or `"json_object"`.
    #[serde(rename = "type")]
    pub format_type: String,
}

/// Body of a streamed `/chat/completions` request.
///
/// Unset optional fields are left out of the JSON so provider defaults apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamChatCompletionRequest {
    /// Always sent as `true`; the client forces it before sending.
    pub stream: bool,
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    /// Qwen3 thinking switch on DashScope's compatible mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_thinking: Option<bool>,
}

impl StreamChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            stream: true,
            model: model.into(),
            messages,
            frequency_penalty: None,
            max_tokens: None,
            presence_penalty: None,
            temperature: None,
            top_p: None,
            response_format: None,
            stop: Vec::new(),
            tools: Vec::new(),
            logprobs: None,
            top_logprobs: None,
            enable_thinking: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_response_format(mut self, format_type: impl Into<String>) -> Self {
        self.response_format = Some(ResponseFormat {
            format_type: format_type.into(),
        });
        self
    }

    /// Request token log probabilities, optionally with `top` alternatives per token.
    pub fn with_logprobs(mut self, top: Option<u32>) -> Self {
        self.logprobs = Some(true);
        self.top_logprobs = top;
        self
    }

    pub fn with_thinking(mut self, enabled: bool) -> Self {
        self.enable_thinking = Some(enabled);
        self
    }
}

/// One decoded `data:` event of a chat completion stream.
///
/// Every field tolerates being absent; gateways differ in what they send.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<StreamChatChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    /// Sent on the final chunk by providers that report usage while streaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl StreamChatCompletionResponse {
    /// Content delta of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }

    /// Reasoning delta of the first choice.
    pub fn reasoning_content(&self) -> Option<&str> {
        self.choices.first()?.delta.reasoning_content.as_deref()
    }

    /// Finish reason of the first choice, ignoring the empty placeholder some
    /// providers send on every chunk.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()?
            .finish_reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamChatChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: StreamChatDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<LogProbs>,
    /// `None` when absent or `null`; an empty string is kept as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental fragment of the assistant message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamChatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatMessageRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A tool call, or a fragment of one when streaming.
///
/// Streamed fragments share an `index`; `arguments` arrives in pieces that the
/// caller concatenates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogProbs {
    #[serde(default)]
    pub content: Vec<TokenLogProb>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenLogProb {
    pub token: String,
    pub logprob: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub top_logprobs: Vec<TopLogProb>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopLogProb {
    pub token: String,
    pub logprob: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_cache_hit_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_cache_miss_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_unset_fields() {
        let request = StreamChatCompletionRequest::new(
            names::DEEPSEEK_CHAT,
            vec![ChatCompletionMessage::user("Hello!")],
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "stream": true,
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "Hello!"}],
            })
        );
    }

    #[test]
    fn test_request_with_tools() {
        let mut properties = Map::new();
        properties.insert(
            "location".to_string(),
            json!({"type": "string", "description": "The location to get weather"}),
        );
        let request = StreamChatCompletionRequest::new(
            names::QWQ_32B,
            vec![ChatCompletionMessage::user("How's the weather in Hangzhou?")],
        )
        .with_tool(Tool::function(Function {
            name: "get_weather".to_string(),
            description: "Get weather of a location".to_string(),
            parameters: Some(Parameters {
                schema_type: "object".to_string(),
                properties,
                required: vec!["location".to_string()],
            }),
        }))
        .with_thinking(true)
        .with_temperature(0.5);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "get_weather");
        assert_eq!(value["tools"][0]["function"]["parameters"]["required"], json!(["location"]));
        assert_eq!(value["enable_thinking"], true);
        assert_eq!(value["temperature"], 0.5);
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_tool_message() {
        let value = serde_json::to_value(ChatCompletionMessage::tool("call_1", "sunny")).unwrap();
        assert_eq!(
            value,
            json!({"role": "tool", "content": "sunny", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn test_delta_keeps_absent_and_empty_apart() {
        let raw = json!({
            "id": "1",
            "choices": [{
                "index": 0,
                "delta": {"content": "", "reasoning_content": null},
                "finish_reason": null
            }]
        });

        let event: StreamChatCompletionResponse = serde_json::from_value(raw).unwrap();
        let choice = &event.choices[0];
        assert_eq!(choice.delta.content.as_deref(), Some(""));
        assert_eq!(choice.delta.reasoning_content, None);
        assert_eq!(choice.delta.tool_calls, None);
        assert_eq!(choice.finish_reason, None);

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["choices"][0]["delta"], json!({"content": ""}));
        assert!(back["choices"][0].get("finish_reason").is_none());
    }

    #[test]
    fn test_full_event_decodes() {
        let raw = r#"{
            "id": "930c60df",
            "object": "chat.completion.chunk",
            "created": 1738225614,
            "model": "deepseek-reasoner",
            "system_fingerprint": "fp_7e73fd9a08",
            "choices": [{
                "index": 0,
                "delta": {"role": "assistant", "content": null, "reasoning_content": "Let me"},
                "logprobs": null,
                "finish_reason": null
            }]
        }"#;

        let event: StreamChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(event.object, "chat.completion.chunk");
        assert_eq!(event.created, 1738225614);
        assert_eq!(event.system_fingerprint.as_deref(), Some("fp_7e73fd9a08"));
        assert_eq!(event.content(), None);
        assert_eq!(event.reasoning_content(), Some("Let me"));
        assert_eq!(event.choices[0].delta.role, Some(ChatMessageRole::Assistant));
    }

    #[test]
    fn test_tool_call_fragments() {
        let raw = r#"{"choices":[{"index":0,"delta":{"tool_calls":[
            {"index":0,"id":"call_0","type":"function","function":{"name":"get_weather","arguments":""}}
        ]}}]}"#;
        let first: StreamChatCompletionResponse = serde_json::from_str(raw).unwrap();

        let raw = r#"{"choices":[{"index":0,"delta":{"tool_calls":[
            {"index":0,"function":{"arguments":"{\"location\":"}}
        ]}}]}"#;
        let second: StreamChatCompletionResponse = serde_json::from_str(raw).unwrap();

        let head = &first.choices[0].delta.tool_calls.as_ref().unwrap()[0];
        assert_eq!(head.id.as_deref(), Some("call_0"));
        assert_eq!(head.call_type.as_deref(), Some("function"));
        let function = head.function.as_ref().unwrap();
        assert_eq!(function.name.as_deref(), Some("get_weather"));
        assert_eq!(function.arguments.as_deref(), Some(""));

        let tail = &second.choices[0].delta.tool_calls.as_ref().unwrap()[0];
        assert_eq!(tail.index, Some(0));
        assert_eq!(tail.id, None);
        let function = tail.function.as_ref().unwrap();
        assert_eq!(function.name, None);
        assert_eq!(function.arguments.as_deref(), Some("{\"location\":"));
    }

    #[test]
    fn test_finish_reason_and_usage() {
        let raw = r#"{"id":"1","choices":[{"index":0,"delta":{"content":""},"finish_reason":"stop"}],
            "usage":{"prompt_tokens":11,"completion_tokens":5,"total_tokens":16,"prompt_cache_hit_tokens":0,"prompt_cache_miss_tokens":11}}"#;

        let event: StreamChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(event.finish_reason(), Some("stop"));
        let usage = event.usage.unwrap();
        assert_eq!(usage.total_tokens, 16);
        assert_eq!(usage.prompt_cache_miss_tokens, Some(11));

        let placeholder: StreamChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"index":0,"delta":{},"finish_reason":""}]}"#).unwrap();
        assert_eq!(placeholder.finish_reason(), None);
        assert_eq!(placeholder.choices[0].finish_reason.as_deref(), Some(""));
    }

    #[test]
    fn test_logprobs_decode() {
        let raw = r#"{"choices":[{"index":0,"delta":{"content":"Hi"},
            "logprobs":{"content":[{"token":"Hi","logprob":-0.01,"bytes":[72,105],
                "top_logprobs":[{"token":"Hi","logprob":-0.01},{"token":"Hello","logprob":-4.6}]}]}}]}"#;

        let event: StreamChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let logprobs = event.choices[0].logprobs.as_ref().unwrap();
        assert_eq!(logprobs.content[0].bytes.as_deref(), Some(&[72u8, 105][..]));
        assert_eq!(logprobs.content[0].top_logprobs.len(), 2);
    }
}
