//! Image generation providers.

#[cfg(feature = "huggingface")]
mod huggingface;
#[cfg(feature = "pollinations")]
mod pollinations;

#[cfg(feature = "huggingface")]
pub use huggingface::{HuggingFaceProvider, HuggingFaceProviderBuilder};

#[cfg(feature = "pollinations")]
pub use pollinations::{PollinationsProvider, PollinationsProviderBuilder};
