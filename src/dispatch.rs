//! Request dispatch: one provider call per submission, normalized into a
//! [`GenerationResult`] and rendered through a [`GenerationView`].

use crate::error::{ErrorKind, GenArtError, Result};
use crate::image::{GeneratedImage, GenerationRequest, ImageProvider, ProviderKind};
use serde::Serialize;

/// Message used when a submission has no prompt.
pub const EMPTY_PROMPT_MESSAGE: &str = "Enter a prompt!";

/// Best-effort advice attached to a failed Hugging Face generation.
///
/// Derived from the error text, not from a structured error code, so it is
/// only suitable for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureHint {
    /// The model was asleep and is still loading.
    ColdStart,
    /// Too many requests.
    RateLimited,
    /// The access token is missing or rejected.
    Auth,
    /// Nothing more specific is known.
    Generic,
}

impl FailureHint {
    /// Picks a hint from an error message. The first matching rule wins.
    ///
    /// Only `401`/`Unauthorized` select [`FailureHint::Auth`]; a `403 Forbidden`
    /// message falls through to [`FailureHint::Generic`].
    pub fn classify(message: &str) -> Self {
        if message.contains("loading") || message.contains("503") {
            Self::ColdStart
        } else if message.contains("Rate limit") || message.contains("429") {
            Self::RateLimited
        } else if message.contains("401") || message.contains("Unauthorized") {
            Self::Auth
        } else {
            Self::Generic
        }
    }

    /// Returns the tip shown to the user.
    pub fn tip(&self) -> &'static str {
        match self {
            Self::ColdStart => {
                "Hugging Face models go to sleep after inactivity. Wait 30-60 seconds and try again."
            }
            Self::RateLimited => "Rate limit exceeded. Please wait a moment and try again.",
            Self::Auth => "Please check your HF_TOKEN environment variable.",
            Self::Generic => "Re-run with RUST_LOG=debug for more details.",
        }
    }
}

impl std::fmt::Display for FailureHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tip())
    }
}

/// A generation that did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    /// Whether the request failed before or after reaching the network.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Advice for the user, when the provider supports it.
    pub hint: Option<FailureHint>,
}

impl GenerationFailure {
    /// Creates a validation failure with no hint.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            hint: None,
        }
    }

    fn from_error(err: &GenArtError, provider: ProviderKind) -> Self {
        let kind = err.kind();
        let hint = match (provider, kind) {
            (ProviderKind::HuggingFace, ErrorKind::Transport) => {
                Some(FailureHint::classify(&err.to_string()))
            }
            _ => None,
        };
        Self {
            kind,
            message: err.user_message(),
            hint,
        }
    }
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Outcome of a single dispatch.
#[derive(Debug, Clone)]
#[must_use = "a generation result should be displayed"]
pub enum GenerationResult {
    /// The provider returned an image.
    Success(GeneratedImage),
    /// The request was rejected or the provider call failed.
    Failure(GenerationFailure),
}

impl GenerationResult {
    /// Returns true for [`GenerationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the image, if any.
    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            Self::Success(image) => Some(image),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// Display surface driven by [`Dispatcher::submit`].
///
/// Each call replaces whatever the output region showed before, so a new
/// submission overwrites the previous result.
pub trait GenerationView {
    /// Tells the user a submission was rejected before dispatch.
    fn alert(&mut self, message: &str);

    /// Disables (`true`) or re-enables (`false`) the submit control.
    fn set_busy(&mut self, busy: bool);

    /// Shows a loading placeholder for the given provider.
    fn show_loading(&mut self, provider: ProviderKind);

    /// Shows a generated image.
    fn show_image(&mut self, image: &GeneratedImage);

    /// Shows a failure message and its hint.
    fn show_error(&mut self, failure: &GenerationFailure);
}

/// Routes each request to exactly one provider, chosen by [`ProviderKind`].
pub struct Dispatcher {
    pollinations: Option<Box<dyn ImageProvider>>,
    huggingface: Option<Box<dyn ImageProvider>>,
}

impl Dispatcher {
    /// Creates a new `DispatcherBuilder`.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Builds every provider enabled at compile time with its default settings.
    ///
    /// A missing Hugging Face token only produces a warning here; requests to
    /// that provider fail until it is set.
    pub fn from_env() -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = Self::builder();
        #[cfg(feature = "pollinations")]
        {
            let provider = crate::image::providers::PollinationsProvider::builder().build()?;
            builder = builder.pollinations(provider);
        }
        #[cfg(feature = "huggingface")]
        {
            let provider = crate::image::providers::HuggingFaceProvider::builder().build()?;
            builder = builder.huggingface(provider);
        }
        Ok(builder.build())
    }

    /// Returns the provider registered for `kind`.
    pub fn provider(&self, kind: ProviderKind) -> Result<&dyn ImageProvider> {
        let slot = match kind {
            ProviderKind::Pollinations => &self.pollinations,
            ProviderKind::HuggingFace => &self.huggingface,
        };
        slot.as_deref()
            .ok_or_else(|| GenArtError::ProviderNotAvailable(kind.to_string()))
    }

    /// Performs one provider call and normalizes the outcome.
    ///
    /// Blank prompts are rejected without any network traffic. Errors never
    /// escape; every failure becomes [`GenerationResult::Failure`].
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        if request.is_blank() {
            let failure = GenerationFailure::validation(EMPTY_PROMPT_MESSAGE);
            return GenerationResult::Failure(failure);
        }

        let provider = match request
            .validate_size()
            .and_then(|()| self.provider(request.provider))
        {
            Ok(provider) => provider,
            Err(err) => {
                return GenerationResult::Failure(GenerationFailure::from_error(
                    &err,
                    request.provider,
                ))
            }
        };

        tracing::info!(
            provider = %request.provider,
            model = provider.model().unwrap_or("default"),
            prompt = %request.prompt_preview(),
            "generating image"
        );

        match provider.generate(request).await {
            Ok(image) => {
                tracing::info!(
                    provider = %image.provider,
                    size_bytes = image.size(),
                    mime = image.mime_type(),
                    duration_ms = image.metadata.duration_ms,
                    "image generated"
                );
                GenerationResult::Success(image)
            }
            Err(err) => {
                tracing::error!(
                    provider = %request.provider,
                    error = %err,
                    "image generation failed"
                );
                GenerationResult::Failure(GenerationFailure::from_error(&err, request.provider))
            }
        }
    }

    /// Runs a full submission against a view.
    ///
    /// Blank prompts only raise an alert and return `None`. Otherwise the
    /// control is disabled, a loading placeholder is shown, the result is
    /// rendered, and the control is re-enabled whether or not generation
    /// succeeded.
    pub async fn submit<V>(
        &self,
        request: &GenerationRequest,
        view: &mut V,
    ) -> Option<GenerationResult>
    where
        V: GenerationView + ?Sized,
    {
        if request.is_blank() {
            view.alert(EMPTY_PROMPT_MESSAGE);
            return None;
        }

        view.set_busy(true);
        view.show_loading(request.provider);

        let result = self.generate(request).await;
        match &result {
            GenerationResult::Success(image) => view.show_image(image),
            GenerationResult::Failure(failure) => view.show_error(failure),
        }

        view.set_busy(false);
        Some(result)
    }
}

/// Builder for Dispatcher.
#[derive(Default)]
pub struct DispatcherBuilder {
    pollinations: Option<Box<dyn ImageProvider>>,
    huggingface: Option<Box<dyn ImageProvider>>,
}

impl DispatcherBuilder {
    /// Registers the provider used for [`ProviderKind::Pollinations`].
    pub fn pollinations(mut self, provider: impl ImageProvider + 'static) -> Self {
        self.pollinations = Some(Box::new(provider));
        self
    }

    /// Registers the provider used for [`ProviderKind::HuggingFace`].
    pub fn huggingface(mut self, provider: impl ImageProvider + 'static) -> Self {
        self.huggingface = Some(Box::new(provider));
        self
    }

    /// Builds the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            pollinations: self.pollinations,
            huggingface: self.huggingface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{GenerationMetadata, ImageFormat};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider double that counts calls and replays a fixed outcome.
    struct StubProvider {
        kind: ProviderKind,
        calls: Arc<AtomicUsize>,
        outcome: fn() -> Result<Vec<u8>>,
    }

    impl StubProvider {
        fn new(kind: ProviderKind, outcome: fn() -> Result<Vec<u8>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    kind,
                    calls: Arc::clone(&calls),
                    outcome,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let data = (self.outcome)()?;
            Ok(GeneratedImage::new(
                data,
                ImageFormat::Png,
                self.kind,
                GenerationMetadata::default(),
            ))
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Alert(String),
        Busy(bool),
        Loading(ProviderKind),
        Image(usize),
        Error(String, Option<FailureHint>),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<Event>,
    }

    impl GenerationView for RecordingView {
        fn alert(&mut self, message: &str) {
            self.events.push(Event::Alert(message.to_string()));
        }

        fn set_busy(&mut self, busy: bool) {
            self.events.push(Event::Busy(busy));
        }

        fn show_loading(&mut self, provider: ProviderKind) {
            self.events.push(Event::Loading(provider));
        }

        fn show_image(&mut self, image: &GeneratedImage) {
            self.events.push(Event::Image(image.size()));
        }

        fn show_error(&mut self, failure: &GenerationFailure) {
            self.events
                .push(Event::Error(failure.message.clone(), failure.hint));
        }
    }

    fn ok_bytes() -> Result<Vec<u8>> {
        Ok(vec![1, 2, 3])
    }

    fn rate_limited() -> Result<Vec<u8>> {
        Err(GenArtError::RateLimited {
            message: String::new(),
            retry_after: None,
        })
    }

    fn missing_token() -> Result<Vec<u8>> {
        Err(GenArtError::MissingCredential { env_var: "HF_TOKEN" })
    }

    fn server_error() -> Result<Vec<u8>> {
        Err(GenArtError::Api {
            status: 500,
            message: "Failed to generate image. Please try again.".into(),
        })
    }

    #[test]
    fn test_classify_hint() {
        use FailureHint::*;

        assert_eq!(FailureHint::classify("Model is currently loading"), ColdStart);
        assert_eq!(FailureHint::classify("API error: 503 - busy"), ColdStart);
        assert_eq!(FailureHint::classify("Rate limit reached"), RateLimited);
        assert_eq!(FailureHint::classify("status 429"), RateLimited);
        assert_eq!(FailureHint::classify("401 bad token"), Auth);
        assert_eq!(FailureHint::classify("Unauthorized"), Auth);
        assert_eq!(FailureHint::classify("something else"), Generic);
        // matching is case-sensitive
        assert_eq!(FailureHint::classify("rate limit"), Generic);
        // earlier rules win
        assert_eq!(FailureHint::classify("429 while loading"), ColdStart);
        assert_eq!(FailureHint::classify("Rate limit, 401"), RateLimited);
    }

    #[test]
    fn test_hint_from_error_display() {
        let err = GenArtError::RateLimited {
            message: "Rate limit reached".into(),
            retry_after: Some(std::time::Duration::from_secs(12)),
        };
        assert_eq!(FailureHint::classify(&err.to_string()), FailureHint::RateLimited);

        let err = GenArtError::Auth("401 Unauthorized: bad token".into());
        assert_eq!(FailureHint::classify(&err.to_string()), FailureHint::Auth);

        let err = GenArtError::ModelLoading {
            message: "warming".into(),
            estimated_time: None,
        };
        assert_eq!(FailureHint::classify(&err.to_string()), FailureHint::ColdStart);

        let err = GenArtError::Auth("403 Forbidden: no access to model".into());
        assert_eq!(FailureHint::classify(&err.to_string()), FailureHint::Generic);
    }

    #[tokio::test]
    async fn test_blank_prompt_is_not_dispatched() {
        let (pollinations, p_calls) = StubProvider::new(ProviderKind::Pollinations, ok_bytes);
        let (huggingface, h_calls) = StubProvider::new(ProviderKind::HuggingFace, ok_bytes);
        let dispatcher = Dispatcher::builder()
            .pollinations(pollinations)
            .huggingface(huggingface)
            .build();

        for prompt in ["", "   ", "\n\t"] {
            for kind in ProviderKind::ALL {
                let result = dispatcher.generate(&GenerationRequest::new(prompt, kind)).await;
                let failure = result.failure().unwrap();
                assert_eq!(failure.kind, ErrorKind::Validation);
                assert_eq!(failure.message, EMPTY_PROMPT_MESSAGE);
                assert_eq!(failure.hint, None);
            }
        }

        assert_eq!(p_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_routes_to_selected_provider_only() {
        let (pollinations, p_calls) = StubProvider::new(ProviderKind::Pollinations, ok_bytes);
        let (huggingface, h_calls) = StubProvider::new(ProviderKind::HuggingFace, ok_bytes);
        let dispatcher = Dispatcher::builder()
            .pollinations(pollinations)
            .huggingface(huggingface)
            .build();

        let result = dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::HuggingFace))
            .await;

        assert_eq!(result.image().unwrap().provider, ProviderKind::HuggingFace);
        assert_eq!(p_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_huggingface_failure_carries_hint() {
        let (huggingface, _) = StubProvider::new(ProviderKind::HuggingFace, rate_limited);
        let dispatcher = Dispatcher::builder().huggingface(huggingface).build();

        let result = dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::HuggingFace))
            .await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Transport);
        assert_eq!(failure.hint, Some(FailureHint::RateLimited));
    }

    #[tokio::test]
    async fn test_missing_credential_is_validation_failure() {
        let (huggingface, _) = StubProvider::new(ProviderKind::HuggingFace, missing_token);
        let dispatcher = Dispatcher::builder().huggingface(huggingface).build();

        let result = dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::HuggingFace))
            .await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Validation);
        assert!(failure.message.contains("HF_TOKEN"));
        assert_eq!(failure.hint, None);
    }

    #[tokio::test]
    async fn test_pollinations_failure_has_no_hint() {
        let (pollinations, _) = StubProvider::new(ProviderKind::Pollinations, server_error);
        let dispatcher = Dispatcher::builder().pollinations(pollinations).build();

        let result = dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::Pollinations))
            .await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.message, "Failed to generate image. Please try again.");
        assert_eq!(failure.hint, None);
    }

    #[tokio::test]
    async fn test_zero_size_is_rejected_before_dispatch() {
        let (pollinations, calls) = StubProvider::new(ProviderKind::Pollinations, ok_bytes);
        let dispatcher = Dispatcher::builder().pollinations(pollinations).build();

        let request =
            GenerationRequest::new("a cat", ProviderKind::Pollinations).with_size(0, 512);
        let result = dispatcher.generate(&request).await;

        assert_eq!(result.failure().unwrap().kind, ErrorKind::Validation);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unregistered_provider() {
        let dispatcher = Dispatcher::builder().build();
        let result = dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::Pollinations))
            .await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Validation);
        assert!(failure.message.contains("pollinations"));
    }

    #[tokio::test]
    async fn test_submit_success_sequence() {
        let (pollinations, _) = StubProvider::new(ProviderKind::Pollinations, ok_bytes);
        let dispatcher = Dispatcher::builder().pollinations(pollinations).build();
        let mut view = RecordingView::default();

        let result = dispatcher
            .submit(&GenerationRequest::new("a cat", ProviderKind::Pollinations), &mut view)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(
            view.events,
            vec![
                Event::Busy(true),
                Event::Loading(ProviderKind::Pollinations),
                Event::Image(3),
                Event::Busy(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_failure_reenables_control() {
        let (huggingface, _) = StubProvider::new(ProviderKind::HuggingFace, rate_limited);
        let dispatcher = Dispatcher::builder().huggingface(huggingface).build();
        let mut view = RecordingView::default();

        let result = dispatcher
            .submit(&GenerationRequest::new("a cat", ProviderKind::HuggingFace), &mut view)
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(view.events.len(), 4);
        assert_eq!(view.events[0], Event::Busy(true));
        assert!(matches!(
            view.events[2],
            Event::Error(_, Some(FailureHint::RateLimited))
        ));
        assert_eq!(view.events[3], Event::Busy(false));
    }

    #[tokio::test]
    async fn test_submit_blank_prompt_only_alerts() {
        let (pollinations, calls) = StubProvider::new(ProviderKind::Pollinations, ok_bytes);
        let dispatcher = Dispatcher::builder().pollinations(pollinations).build();
        let mut view = RecordingView::default();

        let result = dispatcher
            .submit(&GenerationRequest::new("  ", ProviderKind::Pollinations), &mut view)
            .await;

        assert!(result.is_none());
        assert_eq!(view.events, vec![Event::Alert(EMPTY_PROMPT_MESSAGE.into())]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[cfg(feature = "pollinations")]
    #[tokio::test]
    async fn test_pollinations_scenario_over_http() {
        use crate::image::providers::PollinationsProvider;
        use httpmock::{Method::GET, MockServer};

        let server = MockServer::start_async().await;
        let body = b"\xFF\xD8\xFFfox-pixels".to_vec();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_includes("/prompt/a")
                    .query_param("width", "512")
                    .query_param("height", "512")
                    .query_param("nologo", "true");
                then.status(200).body(body.clone());
            })
            .await;

        let provider = PollinationsProvider::builder()
            .base_url(server.base_url())
            .build()
            .unwrap();
        let request = GenerationRequest::new("a red fox in snow", ProviderKind::Pollinations);
        assert_eq!(
            provider.image_url(&request),
            format!(
                "{}/prompt/a%20red%20fox%20in%20snow?width=512&height=512&nologo=true",
                server.base_url()
            )
        );

        let dispatcher = Dispatcher::builder().pollinations(provider).build();
        let result = dispatcher.generate(&request).await;

        mock.assert_async().await;
        let image = result.image().unwrap();
        assert_eq!(image.data, body);
        assert!(image.mime_type().starts_with("image/"));
    }

    #[cfg(feature = "pollinations")]
    #[tokio::test]
    async fn test_repeated_requests_are_not_cached() {
        use crate::image::providers::PollinationsProvider;
        use httpmock::{Method::GET, MockServer};

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path_includes("/prompt/");
                then.status(200).header("content-type", "image/jpeg").body("img");
            })
            .await;

        let provider = PollinationsProvider::builder()
            .base_url(server.base_url())
            .build()
            .unwrap();
        let dispatcher = Dispatcher::builder().pollinations(provider).build();
        let request = GenerationRequest::new("same prompt", ProviderKind::Pollinations);

        assert!(dispatcher.generate(&request).await.is_success());
        assert!(dispatcher.generate(&request).await.is_success());
        mock.assert_calls_async(2).await;
    }

    #[cfg(feature = "huggingface")]
    #[tokio::test]
    async fn test_huggingface_cold_start_over_http() {
        use crate::image::providers::HuggingFaceProvider;
        use httpmock::{Method::POST, MockServer};

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path_includes("/models/");
                then.status(503)
                    .body(r#"{"error":"Model is currently loading","estimated_time":20.0}"#);
            })
            .await;

        let provider = HuggingFaceProvider::builder()
            .api_key("hf_test_token")
            .base_url(server.base_url())
            .build()
            .unwrap();
        let dispatcher = Dispatcher::builder().huggingface(provider).build();
        let mut view = RecordingView::default();

        let result = dispatcher
            .submit(&GenerationRequest::new("a cat", ProviderKind::HuggingFace), &mut view)
            .await
            .unwrap();

        let failure = result.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Transport);
        assert_eq!(failure.hint, Some(FailureHint::ColdStart));
        assert_eq!(view.events.last(), Some(&Event::Busy(false)));
    }

    #[cfg(feature = "huggingface")]
    async fn rate_limited_failure(retry_after: Option<&'static str>) -> GenerationFailure {
        use crate::image::providers::HuggingFaceProvider;
        use httpmock::{Method::POST, MockServer};

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path_includes("/models/");
                let body = r#"{"error":"Rate limit reached"}"#;
                match retry_after {
                    Some(secs) => {
                        then.status(429).header("retry-after", secs).body(body);
                    }
                    None => {
                        then.status(429).body(body);
                    }
                }
            })
            .await;

        let provider = HuggingFaceProvider::builder()
            .api_key("hf_test_token")
            .base_url(server.base_url())
            .build()
            .unwrap();
        let dispatcher = Dispatcher::builder().huggingface(provider).build();

        dispatcher
            .generate(&GenerationRequest::new("a cat", ProviderKind::HuggingFace))
            .await
            .failure()
            .cloned()
            .unwrap()
    }

    #[cfg(feature = "huggingface")]
    #[tokio::test]
    async fn test_huggingface_rate_limit_message() {
        let failure = rate_limited_failure(Some("12")).await;
        assert_eq!(
            failure.message,
            "Rate limit exceeded (429): Rate limit reached. Retry after 12s"
        );
        assert_eq!(failure.hint, Some(FailureHint::RateLimited));

        let failure = rate_limited_failure(None).await;
        assert_eq!(failure.message, "Rate limit exceeded (429): Rate limit reached");
        assert_eq!(failure.hint, Some(FailureHint::RateLimited));
    }
}
