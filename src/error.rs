//! Error types for image generation.

use std::time::Duration;

/// Maximum length of a provider error body carried in an error message.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Broad classification of a failure, as seen by the person submitting a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Non-success HTTP status, network failure or undecodable response.
    Transport,
    /// The request was rejected before anything was sent.
    Validation,
}

/// Errors that can occur during image generation.
#[derive(Debug, thiserror::Error)]
pub enum GenArtError {
    /// Credential rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Credential required by the provider is not configured.
    #[error("{env_var} is required. Set it in the environment or in a .env file.")]
    MissingCredential {
        /// Environment variable the credential is read from.
        env_var: &'static str,
    },

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message suitable for display.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded (429){}", rate_limit_detail(.message, .retry_after))]
    RateLimited {
        /// Provider message, possibly empty.
        message: String,
        /// Value of the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// Model is cold and still loading on the provider side.
    #[error("model is loading (503): {message}")]
    ModelLoading {
        /// Provider message.
        message: String,
        /// Provider estimate of the remaining load time.
        estimated_time: Option<Duration>,
    },

    /// Request did not complete within the configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response succeeded but did not contain what was expected.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider not available (feature not enabled or not configured).
    #[error("provider not available: {0}")]
    ProviderNotAvailable(String),
}

impl GenArtError {
    /// Returns whether this failure happened before or after reaching the network.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential { .. }
            | Self::InvalidRequest(_)
            | Self::ProviderNotAvailable(_) => ErrorKind::Validation,
            _ => ErrorKind::Transport,
        }
    }

    /// Returns the text shown to the user for this error.
    ///
    /// API errors carry a message already written for display, so the status
    /// prefix is left off.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Converts a transport-level error, mapping client timeouts to [`GenArtError::Timeout`].
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }
}

/// Renders the provider message and retry delay that follow the 429 prefix.
fn rate_limit_detail(message: &str, retry_after: &Option<Duration>) -> String {
    let message = message.trim().trim_end_matches('.');
    let mut out = String::new();
    if !message.is_empty() {
        out.push_str(": ");
        out.push_str(message);
    }
    if let Some(delay) = retry_after {
        out.push_str(&format!(". Retry after {}s", delay.as_secs()));
    }
    out
}

/// Trims, redacts bearer tokens from, and truncates an error body.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_ERROR_MESSAGE_LEN));
    let mut words = text.split_whitespace().peekable();
    let mut first = true;
    while let Some(word) = words.next() {
        if !first {
            out.push(' ');
        }
        first = false;
        if word.eq_ignore_ascii_case("bearer") && words.peek().is_some() {
            out.push_str(word);
            out.push_str(" [redacted]");
            words.next();
        } else if word.starts_with("hf_") && word.len() > 8 {
            out.push_str("[redacted]");
        } else {
            out.push_str(word);
        }
    }

    if out.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = out.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        return format!("{truncated}...");
    }
    out
}

/// Reads a `Retry-After` header expressed in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Result type alias for image generation operations.
pub type Result<T> = std::result::Result<T, GenArtError>;
