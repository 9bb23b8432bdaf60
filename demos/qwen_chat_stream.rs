//! Streams a Qwen3 answer through DashScope's OpenAI-compatible mode, printing
//! reasoning and tool-call fragments as they arrive.
//!
//! Run with:
//! ```bash
//! export DASHSCOPE_API_KEY="your-api-key"
//! cargo run --example qwen_chat_stream
//! ```

use std::collections::BTreeMap;

use deepseek::model::{
    names, ChatCompletionMessage, Function, Parameters, StreamChatCompletionRequest, Tool,
};
use deepseek::options::{TransportOptions, DASHSCOPE_BASE_URL};
use deepseek::stream::Recv;
use deepseek::Client;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key =
        std::env::var("DASHSCOPE_API_KEY").expect("DASHSCOPE_API_KEY environment variable must be set");
    let client = Client::with_options(TransportOptions::new(api_key).with_base_url(DASHSCOPE_BASE_URL))?;

    let mut properties = serde_json::Map::new();
    properties.insert(
        "location".to_string(),
        json!({"type": "string", "description": "City or district, e.g. Chengdu"}),
    );
    let weather = Tool::function(Function {
        name: "get_weather".to_string(),
        description: "Look up the current weather for a city".to_string(),
        parameters: Some(Parameters {
            schema_type: "object".to_string(),
            properties,
            required: vec!["location".to_string()],
        }),
    });

    let request = StreamChatCompletionRequest::new(
        names::QWEN3_235B_A22B,
        vec![ChatCompletionMessage::user("What's the weather like in Chengdu?")],
    )
    .with_tool(weather)
    .with_thinking(true);

    let cancel = CancellationToken::new();
    let mut stream = client.create_chat_completion_stream(request, &cancel).await?;

    // Tool call arguments arrive in pieces keyed by index.
    let mut calls: BTreeMap<u32, (String, String)> = BTreeMap::new();

    print!("Qwen3: ");
    while let Recv::Event(chunk) = stream.next().await? {
        if let Some(reasoning) = chunk.reasoning_content() {
            print!("{}", reasoning);
        }
        if let Some(content) = chunk.content() {
            print!("{}", content);
        }

        let fragments = chunk
            .choices
            .iter()
            .filter_map(|choice| choice.delta.tool_calls.as_ref())
            .flatten();
        for fragment in fragments {
            let entry = calls.entry(fragment.index.unwrap_or(0)).or_default();
            if let Some(function) = &fragment.function {
                if let Some(name) = &function.name {
                    entry.0.push_str(name);
                }
                if let Some(arguments) = &function.arguments {
                    entry.1.push_str(arguments);
                }
            }
        }

        if let Some(reason) = chunk.finish_reason() {
            println!("\n[finish: {}]", reason);
        }
    }

    for (index, (name, arguments)) in calls {
        println!("tool call #{}: {}({})", index, name, arguments);
    }

    Ok(())
}
