//! `OpenAI`-compatible chat completions adapter.
//!
//! Works against the official API and any server exposing the same
//! `/v1/chat/completions` endpoint. Attached response schemas are forwarded
//! as a `json_schema` response format.

use std::{env, fmt, time::Duration};

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

/// Environment variable used when loading configuration automatically.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const SCHEMA_NAME: &str = "structured_output";

/// Configuration for the `OpenAI` adapter.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a configuration using the supplied default model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: "https://api.openai.com/".to_owned(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Loads the API key from the `OPENAI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(OPENAI_API_KEY_ENV).ok();
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("OpenAI", base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// `OpenAI` adapter that calls the chat completions API over HTTPS.
pub struct OpenAiAdapter {
    transport: JsonTransport,
    endpoint: Uri,
    metadata: AdapterMetadata,
    api_key: String,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or the
    /// endpoint is invalid.
    pub fn new(config: OpenAiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| AdapterError::configuration("OpenAI adapter requires an API key"))?;

        let endpoint = format!("{}v1/chat/completions", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid OpenAI endpoint: {err}"))
            })?;

        Ok(Self {
            transport: JsonTransport::new("OpenAI", config.timeout),
            endpoint,
            metadata: AdapterMetadata::new("openai", config.model),
            api_key,
        })
    }

    fn build_request(&self, request: &InferenceRequest) -> ChatCompletionRequest {
        let messages = request
            .conversation()
            .iter()
            .map(map_prompt_message)
            .collect();

        let response_format = request.response_schema().map(|schema| ResponseFormat {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: SCHEMA_NAME,
                schema: schema.clone(),
                strict: false,
            },
        });

        ChatCompletionRequest {
            model: request
                .model()
                .unwrap_or_else(|| self.metadata.model())
                .to_owned(),
            messages,
            temperature: request.temperature(),
            max_tokens: request.max_output_tokens(),
            response_format,
            stream: false,
        }
    }
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let bytes = self
            .transport
            .post_json(&self.endpoint, Some(&self.api_key), &payload)
            .await?;

        let response: ChatCompletionResponse = serde_json::from_slice(&bytes).map_err(|err| {
            AdapterError::response(format!("failed to decode OpenAI response: {err}"))
        })?;

        let content = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|message| message.content))
            .unwrap_or_default();

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_primitives::{FieldSpec, FieldType, SchemaSpec};

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(OpenAiConfig::new("gpt-4o-mini").with_api_key("test_key"))
            .expect("adapter")
    }

    #[test]
    fn requires_api_key() {
        let err = OpenAiAdapter::new(OpenAiConfig::new("gpt-4o-mini")).expect_err("no key");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn sanitize_allows_trailing_slash() {
        let cfg = OpenAiConfig::new("gpt-4o-mini")
            .with_base_url("https://example.com/openai")
            .expect("valid URL");
        assert_eq!(cfg.base_url, "https://example.com/openai/");
    }

    #[test]
    fn response_parsing_extracts_content() {
        let json = r#"{
            "choices": [
                { "message": { "content": "positive" } }
            ]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|msg| msg.content))
            .unwrap();

        assert_eq!(content, "positive");
    }

    #[test]
    fn build_request_prefers_requested_model() {
        let adapter = adapter();
        let request = InferenceRequest::new(vec![PromptMessage::user("hello")])
            .unwrap()
            .with_system_prompt("system")
            .with_model("gpt-4o")
            .with_temperature(0.3);

        let chat = adapter.build_request(&request);
        assert_eq!(chat.model, "gpt-4o");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.temperature, Some(0.3));
        assert!(chat.response_format.is_none());

        let fallback = adapter.build_request(
            &InferenceRequest::new(vec![PromptMessage::user("hello")]).unwrap(),
        );
        assert_eq!(fallback.model, "gpt-4o-mini");
    }

    #[test]
    fn build_request_attaches_schema() {
        let schema = SchemaSpec::builder()
            .field(FieldSpec::new("label", FieldType::String).required())
            .build()
            .unwrap();
        let request = InferenceRequest::new(vec![PromptMessage::user("classify")])
            .unwrap()
            .with_response_schema(&schema);

        let chat = adapter().build_request(&request);
        let encoded = serde_json::to_value(&chat).unwrap();
        assert_eq!(encoded["response_format"]["type"], "json_schema");
        assert_eq!(
            encoded["response_format"]["json_schema"]["schema"]["properties"]["label"]["type"],
            "string"
        );
    }
}
