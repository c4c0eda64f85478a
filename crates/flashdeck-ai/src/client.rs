#![forbid(unsafe_code)]

//! Completion client and the transport seam.
//!
//! [`Transport`] is the only place a real HTTP stack plugs in; it posts a
//! JSON body and returns a JSON body. [`AiClient`] builds the request,
//! decodes the envelope and maps every failure into [`RequestFailed`].
//! [`CompletionService`] is what the editor consumes, so tests can swap in
//! a scripted service without going through JSON at all.

use serde_json::Value;

use crate::error::{RequestFailed, TransportError};
use crate::request::{CompletionRequest, ContextMode, Target};
use crate::response::CompletionResponse;

/// Default completion endpoint path.
pub const DEFAULT_ENDPOINT: &str = "/api/ai/chat";
/// Default model name.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// JSON-over-POST transport.
pub trait Transport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&str, &Value) -> Result<Value, TransportError>,
{
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        self(endpoint, body)
    }
}

/// Anything that can answer a completion request.
pub trait CompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RequestFailed>;
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiClientConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

impl AiClientConfig {
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Completion client over a [`Transport`].
#[derive(Debug, Clone)]
pub struct AiClient<T> {
    transport: T,
    config: AiClientConfig,
}

impl<T: Transport> AiClient<T> {
    #[must_use]
    pub fn new(transport: T, config: AiClientConfig) -> Self {
        Self { transport, config }
    }

    #[must_use]
    pub fn config(&self) -> &AiClientConfig {
        &self.config
    }

    /// Build a request for `content` with the configured model.
    #[must_use]
    pub fn request(&self, content: &str, context: ContextMode, target: Target) -> CompletionRequest {
        CompletionRequest::new(content, self.config.model.as_str(), target, context)
    }

    /// Ask the service about `content`.
    pub fn fetch_response(
        &self,
        content: &str,
        context: ContextMode,
        target: Target,
    ) -> Result<CompletionResponse, RequestFailed> {
        self.complete(&self.request(content, context, target))
    }
}

impl<T: Transport> CompletionService for AiClient<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
        let body = request.to_json().map_err(TransportError::from)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "flashdeck.ai",
            endpoint = %self.config.endpoint,
            model = %request.model,
            broad = request.mode.is_some(),
            "sending completion request"
        );

        let result = self
            .transport
            .post_json(&self.config.endpoint, &body)
            .map_err(RequestFailed::from)
            .and_then(CompletionResponse::from_envelope);

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::warn!(target: "flashdeck.ai", error = %err, "completion request failed");
        }

        result
    }
}

impl<S: CompletionService + ?Sized> CompletionService for &S {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
        (**self).complete(request)
    }
}
