//! Demonstrates choosing a provider per request through the dispatcher.
//!
//! Run with: `cargo run --example switch_provider`
//!
//! Uses Hugging Face when `HF_TOKEN` is set, Pollinations otherwise.

use artgen::{Dispatcher, GenerationRequest, GenerationResult, ProviderKind};

#[tokio::main]
async fn main() -> artgen::Result<()> {
    let dispatcher = Dispatcher::from_env()?;

    let provider = if std::env::var("HF_TOKEN").is_ok() {
        ProviderKind::HuggingFace
    } else {
        ProviderKind::Pollinations
    };
    println!("Provider: {}", dispatcher.provider(provider)?.name());

    let request = GenerationRequest::new("A serene mountain lake at dawn", provider);
    match dispatcher.generate(&request).await {
        GenerationResult::Success(image) => {
            let filename = format!("{}_output.{}", provider, image.format.extension());
            image.save(&filename)?;
            println!("Saved to {} ({} bytes)", filename, image.size());
        }
        GenerationResult::Failure(failure) => {
            eprintln!("Generation failed: {failure}");
            if let Some(hint) = failure.hint {
                eprintln!("Tip: {hint}");
            }
        }
    }

    Ok(())
}
