//! Hugging Face Inference text-to-image provider.

use crate::error::{parse_retry_after, sanitize_error_message, GenArtError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ProviderKind,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/hf-inference";

/// Environment variable the access token is read from.
pub(crate) const HF_TOKEN_ENV: &str = "HF_TOKEN";

/// Builder for HuggingFaceProvider.
#[derive(Debug, Clone)]
pub struct HuggingFaceProviderBuilder {
    api_key: Option<String>,
    model: String,
    num_inference_steps: u32,
    guidance_scale: f32,
    base_url: String,
    timeout: Duration,
}

impl Default for HuggingFaceProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: HuggingFaceProvider::DEFAULT_MODEL.to_string(),
            num_inference_steps: 20,
            guidance_scale: 7.5,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl HuggingFaceProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the access token. Falls back to `HF_TOKEN` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model repository id, e.g. `stabilityai/stable-diffusion-xl-base-1.0`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the number of denoising steps.
    pub fn num_inference_steps(mut self, steps: u32) -> Self {
        self.num_inference_steps = steps;
        self
    }

    /// Sets the classifier-free guidance scale.
    pub fn guidance_scale(mut self, scale: f32) -> Self {
        self.guidance_scale = scale;
        self
    }

    /// Overrides the inference host, e.g. for a dedicated endpoint or a local mock.
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
    ///
    /// A missing token is not an error here: it is logged, and every call to
    /// `generate` fails with [`GenArtError::MissingCredential`] until one is set.
    pub fn build(self) -> Result<HuggingFaceProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(HF_TOKEN_ENV).ok())
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("{HF_TOKEN_ENV} is not set; Hugging Face requests will fail");
        }

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(HuggingFaceProvider {
            client,
            api_key,
            model: self.model,
            num_inference_steps: self.num_inference_steps,
            guidance_scale: self.guidance_scale,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

/// Hugging Face Inference text-to-image provider.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    num_inference_steps: u32,
    guidance_scale: f32,
    base_url: String,
    timeout: Duration,
}

impl HuggingFaceProvider {
    /// Model used when none is configured.
    pub const DEFAULT_MODEL: &'static str = "stabilityai/stable-diffusion-xl-base-1.0";

    /// Creates a new `HuggingFaceProviderBuilder`.
    pub fn builder() -> HuggingFaceProviderBuilder {
        HuggingFaceProviderBuilder::new()
    }

    /// Returns true if an access token is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    fn parse_error(
        &self,
        status: u16,
        text: &str,
        headers: &reqwest::header::HeaderMap,
    ) -> GenArtError {
        let body: Option<HfErrorBody> = serde_json::from_str(text).ok();
        let estimated_time = body
            .as_ref()
            .and_then(|b| b.estimated_time)
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64);
        let raw = body
            .and_then(|b| b.error)
            .unwrap_or_else(|| text.to_string());
        let message = sanitize_error_message(&raw);

        match status {
            503 => GenArtError::ModelLoading {
                message,
                estimated_time,
            },
            429 => {
                let retry_after = parse_retry_after(headers).map(Duration::from_secs);
                GenArtError::RateLimited {
                    message,
                    retry_after,
                }
            }
            401 | 403 => {
                let reason = if status == 401 {
                    "401 Unauthorized"
                } else {
                    "403 Forbidden"
                };
                if message.is_empty() {
                    GenArtError::Auth(reason.to_string())
                } else {
                    GenArtError::Auth(format!("{reason}: {message}"))
                }
            }
            _ if message.is_empty() => GenArtError::Api {
                status,
                message: format!("Hugging Face request failed with status {status}"),
            },
            _ => GenArtError::Api { status, message },
        }
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenArtError::MissingCredential {
                env_var: HF_TOKEN_ENV,
            })?;

        let start = Instant::now();
        let body = HfTextToImageRequest::new(request, self.num_inference_steps, self.guidance_scale);

        tracing::debug!(
            model = %self.model,
            steps = self.num_inference_steps,
            guidance_scale = self.guidance_scale,
            "requesting image from hugging face"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "image/png")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenArtError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text, &headers));
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

        if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
        {
            let text = String::from_utf8_lossy(&data);
            return Err(GenArtError::UnexpectedResponse(sanitize_error_message(
                &text,
            )));
        }
        if data.is_empty() {
            return Err(GenArtError::UnexpectedResponse(
                "Hugging Face returned an empty image".into(),
            ));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let format = ImageFormat::detect(&data, content_type.as_deref(), ImageFormat::Png);

        Ok(GeneratedImage::new(
            data,
            format,
            ProviderKind::HuggingFace,
            GenerationMetadata {
                model: Some(self.model.clone()),
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model)
    }
}

#[derive(Debug, Serialize)]
struct HfTextToImageRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    num_inference_steps: u32,
    guidance_scale: f32,
    width: u32,
    height: u32,
}

impl HfTextToImageRequest {
    fn new(req: &GenerationRequest, num_inference_steps: u32, guidance_scale: f32) -> Self {
        Self {
            inputs: req.prompt.clone(),
            parameters: HfParameters {
                num_inference_steps,
                guidance_scale,
                width: req.width,
                height: req.height,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct HfErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    estimated_time: Option<f64>,
}
