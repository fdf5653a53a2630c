//! Send a single chat turn to a running Ollama instance.
//!
//! Usage:
//!   cargo run --example test_chat -p ollama-provider -- "your prompt"
//!
//! Requires Ollama listening on http://127.0.0.1:11434 with a model pulled.

use ollama_provider::{OllamaProvider, DEFAULT_BASE_URL};
use provider_core::{Message, Provider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in one sentence.".to_string());

    let provider = OllamaProvider::new(DEFAULT_BASE_URL)?;

    if !provider.health_check().await {
        eprintln!("Ollama is not reachable on {}", DEFAULT_BASE_URL);
        std::process::exit(1);
    }

    let models = provider.list_models().await?;
    println!("Available models:");
    for model in &models {
        println!("  - {}", model.id);
    }

    let Some(model) = models.first().map(|m| m.id.clone()) else {
        eprintln!("No models pulled; run `ollama pull llama3` first.");
        std::process::exit(1);
    };

    let messages = [
        Message::system("You are a helpful assistant."),
        Message::user(&prompt),
    ];
    let response = provider.chat(&messages, &model).await?;

    println!("\n[{}] {}", response.model, response.text);
    if let Some(usage) = response.usage {
        println!(
            "tokens: prompt {}, completion {}, total {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(())
}
