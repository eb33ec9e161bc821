//! Core types for image generation.

use crate::error::{GenArtError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default edge length, in pixels, requested from either provider.
pub const DEFAULT_DIMENSION: u32 = 512;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Attempts to detect format from a `Content-Type` value such as
    /// `image/jpeg; charset=binary`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next()?.trim().to_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF: GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }

    /// Resolves the format of a response body, preferring the bytes over the
    /// declared content type.
    pub(crate) fn detect(data: &[u8], content_type: Option<&str>, fallback: Self) -> Self {
        Self::from_magic_bytes(data)
            .or_else(|| content_type.and_then(Self::from_content_type))
            .unwrap_or(fallback)
    }
}

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Pollinations direct HTTP image endpoint.
    Pollinations,
    /// Hugging Face hosted inference.
    HuggingFace,
}

impl ProviderKind {
    /// All provider kinds, in display order.
    pub const ALL: [ProviderKind; 2] = [Self::Pollinations, Self::HuggingFace];

    /// Returns the human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pollinations => "Pollinations",
            Self::HuggingFace => "Hugging Face",
        }
    }

    /// Returns the environment variable holding this provider's credential, if it needs one.
    pub fn credential_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Pollinations => None,
            Self::HuggingFace => Some("HF_TOKEN"),
        }
    }

    /// Returns how long a generation usually takes, for loading placeholders.
    pub fn typical_wait(&self) -> &'static str {
        match self {
            Self::Pollinations => "8-20 seconds",
            Self::HuggingFace => "10-30 seconds",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pollinations => write!(f, "pollinations"),
            Self::HuggingFace => write!(f, "huggingface"),
        }
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A request to generate an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Provider the request is sent to.
    pub provider: ProviderKind,
    /// Desired width in pixels.
    pub width: u32,
    /// Desired height in pixels.
    pub height: u32,
}

impl GenerationRequest {
    /// Creates a new 512x512 request for the given prompt and provider.
    pub fn new(prompt: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            prompt: prompt.into(),
            provider,
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
        }
    }

    /// Sets the desired dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns true if the prompt has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.prompt.trim().is_empty()
    }

    /// Rejects zero-sized dimensions.
    pub fn validate_size(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GenArtError::InvalidRequest(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Returns the first 50 characters of the prompt, for logging.
    pub fn prompt_preview(&self) -> String {
        let preview: String = self.prompt.chars().take(50).collect();
        if preview.len() < self.prompt.len() {
            format!("{preview}...")
        } else {
            preview
        }
    }
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or displayed"]
pub struct GeneratedImage {
    /// Raw image bytes, exactly as returned by the provider.
    pub data: Vec<u8>,
    /// Image format.
    pub format: ImageFormat,
    /// Provider that generated this image.
    pub provider: ProviderKind,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(
        data: Vec<u8>,
        format: ImageFormat,
        provider: ProviderKind,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            data,
            format,
            provider,
            metadata,
        }
    }

    /// Returns the MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Returns the actual format detected from magic bytes.
    pub fn detected_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_magic_bytes(&self.data)
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }
}
