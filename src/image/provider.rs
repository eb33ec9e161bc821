//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest, ProviderKind};
use async_trait::async_trait;

/// Trait for image generation providers.
///
/// Implementations issue exactly one outbound request per call to
/// [`generate`](ImageProvider::generate) and never retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        self.kind().display_name()
    }

    /// Returns the model identifier used by this provider, if it exposes one.
    fn model(&self) -> Option<&str> {
        None
    }
}
