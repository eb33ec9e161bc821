//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image`
//!
//! Uses Pollinations, which needs no API key.

use artgen::{GenerationRequest, ImageProvider, PollinationsProvider, ProviderKind};

#[tokio::main]
async fn main() -> artgen::Result<()> {
    let provider = PollinationsProvider::builder().build()?;

    let request = GenerationRequest::new(
        "A 16th-century woman with long brown hair standing in front of a green vista with cloudy skies",
        ProviderKind::Pollinations,
    );
    let image = provider.generate(&request).await?;

    let path = format!("output.{}", image.format.extension());
    image.save(&path)?;
    println!(
        "Generated image: {} bytes, format: {:?}, saved to {}",
        image.size(),
        image.format,
        path
    );

    Ok(())
}
