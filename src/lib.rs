#![warn(missing_docs)]
//! artgen - text-to-image generation through Pollinations or Hugging Face.
//!
//! A [`Dispatcher`] sends each [`GenerationRequest`] to exactly one provider,
//! selected by [`ProviderKind`], and folds the outcome into a
//! [`GenerationResult`]. Nothing is retried or cached.
//!
//! # Quick Start
//!
//! ```no_run
//! use artgen::{Dispatcher, GenerationRequest, GenerationResult, ProviderKind};
//!
//! #[tokio::main]
//! async fn main() -> artgen::Result<()> {
//!     let dispatcher = Dispatcher::from_env()?;
//!     let request = GenerationRequest::new("A red fox in snow", ProviderKind::Pollinations);
//!     match dispatcher.generate(&request).await {
//!         GenerationResult::Success(image) => image.save("fox.jpg")?,
//!         GenerationResult::Failure(failure) => eprintln!("{failure}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `pollinations`: Pollinations direct image endpoint (no credential)
//! - `huggingface`: Hugging Face Inference (`HF_TOKEN`)
//! - `cli`: Command-line interface

pub mod dispatch;
mod error;
pub mod image;

// Re-export error types at crate root
pub use error::{ErrorKind, GenArtError, Result};

pub use dispatch::{
    Dispatcher, DispatcherBuilder, FailureHint, GenerationFailure, GenerationResult,
    GenerationView, EMPTY_PROMPT_MESSAGE,
};

pub use image::{
    GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ImageProvider,
    ProviderKind,
};

#[cfg(feature = "pollinations")]
pub use image::providers::{PollinationsProvider, PollinationsProviderBuilder};

#[cfg(feature = "huggingface")]
pub use image::providers::{HuggingFaceProvider, HuggingFaceProviderBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dispatch::{Dispatcher, GenerationResult, GenerationView};
    pub use crate::error::{GenArtError, Result};
    pub use crate::image::{GeneratedImage, GenerationRequest, ImageProvider, ProviderKind};

    #[cfg(feature = "pollinations")]
    pub use crate::image::providers::PollinationsProvider;

    #[cfg(feature = "huggingface")]
    pub use crate::image::providers::HuggingFaceProvider;
}
