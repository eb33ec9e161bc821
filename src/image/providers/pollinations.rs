//! Pollinations image generation provider.
//!
//! Pollinations serves images straight from a GET on
//! `/prompt/{prompt}`; there is no job to poll and no credential.

use crate::error::{GenArtError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ProviderKind,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";

/// Message shown for any non-success response.
pub(crate) const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";

/// Builder for PollinationsProvider.
#[derive(Debug, Clone)]
pub struct PollinationsProviderBuilder {
    base_url: String,
    timeout: Duration,
}

impl Default for PollinationsProviderBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl PollinationsProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API host, e.g. for a proxy or a local mock.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider.
    pub fn build(self) -> Result<PollinationsProvider> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(PollinationsProvider {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

/// Pollinations image generation provider.
pub struct PollinationsProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PollinationsProvider {
    /// Creates a new `PollinationsProviderBuilder`.
    pub fn builder() -> PollinationsProviderBuilder {
        PollinationsProviderBuilder::new()
    }

    /// Builds the image URL for a request. The prompt becomes a single
    /// percent-encoded path segment.
    pub fn image_url(&self, request: &GenerationRequest) -> String {
        format!(
            "{}/prompt/{}?width={}&height={}&nologo=true",
            self.base_url,
            urlencoding::encode(&request.prompt),
            request.width,
            request.height,
        )
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let start = Instant::now();
        let url = self.image_url(request);
        tracing::debug!(url = %url, "requesting image from pollinations");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenArtError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "pollinations returned an error status");
            return Err(GenArtError::Api {
                status: status.as_u16(),
                message: GENERATION_FAILED_MESSAGE.into(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let data = response
            .bytes()
            .await
            .map_err(|e| GenArtError::from_transport(e, self.timeout))?
            .to_vec();

        let duration_ms = start.elapsed().as_millis() as u64;
        let format = ImageFormat::detect(&data, content_type.as_deref(), ImageFormat::Jpeg);

        Ok(GeneratedImage::new(
            data,
            format,
            ProviderKind::Pollinations,
            GenerationMetadata {
                model: None,
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Pollinations
    }
}
