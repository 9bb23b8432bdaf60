//! Cancels a running stream from another task after a fixed delay.
//!
//! Run with:
//! ```bash
//! export DEEPSEEK_API_KEY="your-api-key"
//! cargo run --example cancel_stream
//! ```

use std::time::Duration;

use deepseek::model::{names, ChatCompletionMessage, StreamChatCompletionRequest};
use deepseek::stream::Recv;
use deepseek::{Client, ClientError};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = Client::from_env()?;
    let request = StreamChatCompletionRequest::new(
        names::DEEPSEEK_CHAT,
        vec![ChatCompletionMessage::user("Write a very long story about the sea.")],
    );

    let cancel = CancellationToken::new();
    let mut stream = client.create_chat_completion_stream(request, &cancel).await?;

    let timer = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        timer.cancel();
    });

    loop {
        match stream.next().await {
            Ok(Recv::Event(chunk)) => print!("{}", chunk.content().unwrap_or_default()),
            Ok(Recv::End(end)) => {
                println!("\n[ended: {:?}]", end);
                break;
            }
            Err(ClientError::StreamCancelled) => {
                println!("\n[cancelled]");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
