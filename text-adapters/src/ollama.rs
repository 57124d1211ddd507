//! `Ollama` adapter implementation.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    ModelAdapter, PromptMessage,
};
use crate::transport::{JsonTransport, sanitize_base_url};

/// Configuration for the `Ollama` adapter.
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaConfig {
    /// Creates a configuration for the supplied model using the local daemon.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: "http://127.0.0.1:11434/".to_owned(),
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Overrides the base URL of the Ollama daemon.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("Ollama", base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the HTTP timeout for requests to the Ollama daemon.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `Ollama` adapter that calls the `/api/chat` endpoint.
pub struct OllamaAdapter {
    transport: JsonTransport,
    endpoint: Uri,
    metadata: AdapterMetadata,
}

impl fmt::Debug for OllamaAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OllamaAdapter {
    /// Constructs a new adapter from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the endpoint is invalid.
    pub fn new(config: OllamaConfig) -> AdapterResult<Self> {
        let endpoint = format!("{}api/chat", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid Ollama endpoint: {err}"))
            })?;

        Ok(Self {
            transport: JsonTransport::new("Ollama", config.timeout),
            endpoint,
            metadata: AdapterMetadata::new("ollama", config.model),
        })
    }

    fn build_request(&self, request: &InferenceRequest) -> ChatRequest {
        let messages = request
            .conversation()
            .iter()
            .map(map_prompt_message)
            .collect();

        let options = if request.temperature().is_some() || request.max_output_tokens().is_some() {
            Some(ChatOptions {
                temperature: request.temperature(),
                max_output_tokens: request.max_output_tokens(),
            })
        } else {
            None
        };

        ChatRequest {
            model: request
                .model()
                .unwrap_or_else(|| self.metadata.model())
                .to_owned(),
            stream: false,
            messages,
            options,
            format: request.response_schema().cloned(),
        }
    }
}

#[async_trait]
impl ModelAdapter for OllamaAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let bytes = self
            .transport
            .post_json(&self.endpoint, None, &payload)
            .await?;

        let response: ChatResponse = serde_json::from_slice(&bytes).map_err(|err| {
            AdapterError::response(format!("failed to decode Ollama response: {err}"))
        })?;

        if let Some(error) = response.error {
            return Err(AdapterError::response(error));
        }

        let content = response
            .message
            .map(|message| message.content)
            .or(response.response)
            .unwrap_or_default();

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    stream: bool,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "num_predict")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> ChatMessage {
    ChatMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}
