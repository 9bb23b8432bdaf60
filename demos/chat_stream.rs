//! Interactive streaming chat against DeepSeek.
//!
//! Run with:
//! ```bash
//! export DEEPSEEK_API_KEY="your-api-key"
//! cargo run --example chat_stream
//! ```
//! Type `exit` to quit.

use std::io::{BufRead, Write};

use deepseek::model::{names, ChatCompletionMessage, StreamChatCompletionRequest};
use deepseek::stream::{Recv, StreamEnd};
use deepseek::Client;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = Client::from_env()?;
    let cancel = CancellationToken::new();
    let mut messages = Vec::new();

    let stdin = std::io::stdin();
    print!("You: ");
    std::io::stdout().flush()?;

    for line in stdin.lock().lines() {
        let input = line?;
        if input.trim() == "exit" {
            break;
        }
        messages.push(ChatCompletionMessage::user(input));

        let request = StreamChatCompletionRequest::new(names::DEEPSEEK_CHAT, messages.clone());
        let mut stream = client.create_chat_completion_stream(request, &cancel).await?;

        print!("DeepSeek: ");
        let mut reply = String::new();
        loop {
            match stream.next().await? {
                Recv::Event(chunk) => {
                    if let Some(content) = chunk.content() {
                        print!("{}", content);
                        std::io::stdout().flush()?;
                        reply.push_str(content);
                    }
                }
                Recv::End(StreamEnd::Eof) => {
                    eprintln!("\n[connection closed before the response finished]");
                    break;
                }
                Recv::End(_) => break,
            }
        }
        stream.close();

        messages.push(ChatCompletionMessage::assistant(reply));
        print!("\nYou: ");
        std::io::stdout().flush()?;
    }

    Ok(())
}
