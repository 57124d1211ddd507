//! Single entry point for model calls.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use text_adapters::{InferenceRequest, ModelAdapter, PromptMessage};
use text_config::{TextConfig, validate_temperature};
use text_primitives::{Error, Operation, Result, SchemaInput, SchemaSpec, normalize};
use tracing::debug;

/// Extra chat settings forwarded to the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatOption {
    /// Upper bound on generated tokens.
    MaxOutputTokens(u32),
    /// System prompt sent ahead of the operation prompt.
    SystemPrompt(String),
}

impl ChatOption {
    /// Interprets a loosely typed `name = value` pair.
    ///
    /// Returns `None` for unknown names or values of the wrong type.
    #[must_use]
    pub fn from_named(name: &str, value: &Value) -> Option<Self> {
        match name {
            "max_output_tokens" | "max_tokens" => value
                .as_u64()
                .and_then(|tokens| u32::try_from(tokens).ok())
                .map(Self::MaxOutputTokens),
            "system_prompt" | "instructions" => {
                value.as_str().map(|prompt| Self::SystemPrompt(prompt.to_owned()))
            }
            _ => None,
        }
    }

    fn apply(&self, request: InferenceRequest) -> InferenceRequest {
        match self {
            Self::MaxOutputTokens(tokens) => request.with_max_output_tokens(*tokens),
            Self::SystemPrompt(prompt) => request.with_system_prompt(prompt.clone()),
        }
    }
}

/// Per-call overrides shared by every operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallOptions {
    model: Option<String>,
    temperature: Option<f32>,
    options: Vec<ChatOption>,
}

impl CallOptions {
    /// Creates empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `model` instead of the configured one.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Uses `temperature` instead of the configured one.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Adds a chat option.
    #[must_use]
    pub fn with_option(mut self, option: ChatOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a chat option by name, ignoring names the adapter cannot honour.
    #[must_use]
    pub fn with_named_option(self, name: &str, value: Value) -> Self {
        match ChatOption::from_named(name, &value) {
            Some(option) => self.with_option(option),
            None => {
                debug!(option = name, "ignoring unsupported chat option");
                self
            }
        }
    }

    /// Model override, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Temperature override, if any.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Chat options in insertion order.
    #[must_use]
    pub fn options(&self) -> &[ChatOption] {
        &self.options
    }
}

/// Gives an options struct the shared `with_model`/`with_temperature`/
/// `with_option` builders by delegating to its `call` field.
macro_rules! call_options {
    ($($options:ty),+ $(,)?) => {
        $(
            impl $options {
                /// Uses `model` instead of the configured one.
                #[must_use]
                pub fn with_model(mut self, model: impl Into<String>) -> Self {
                    self.call = self.call.with_model(model);
                    self
                }

                /// Uses `temperature` instead of the configured one.
                #[must_use]
                pub fn with_temperature(mut self, temperature: f32) -> Self {
                    self.call = self.call.with_temperature(temperature);
                    self
                }

                /// Adds a chat option.
                #[must_use]
                pub fn with_option(mut self, option: $crate::gateway::ChatOption) -> Self {
                    self.call = self.call.with_option(option);
                    self
                }

                /// Adds a chat option by name; unknown names are ignored.
                #[must_use]
                pub fn with_named_option(mut self, name: &str, value: serde_json::Value) -> Self {
                    self.call = self.call.with_named_option(name, value);
                    self
                }

                /// Per-call overrides.
                #[must_use]
                pub fn call_options(&self) -> &$crate::gateway::CallOptions {
                    &self.call
                }
            }
        )+
    };
}

pub(crate) use call_options;

/// Resolves model settings, sends one prompt and returns the raw reply.
#[derive(Clone)]
pub struct ModelGateway {
    adapter: Arc<dyn ModelAdapter>,
    config: Arc<TextConfig>,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.adapter.metadata();
        f.debug_struct("ModelGateway")
            .field("provider", &metadata.provider())
            .field("model", &metadata.model())
            .field("config", &self.config)
            .finish()
    }
}

impl ModelGateway {
    /// Creates a gateway over `adapter` using `config`.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>, config: TextConfig) -> Self {
        Self {
            adapter,
            config: Arc::new(config),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Mutable access to the configuration; clones it if a snapshot is shared.
    pub fn config_mut(&mut self) -> &mut TextConfig {
        Arc::make_mut(&mut self.config)
    }

    /// Normalizes `schema` using the configured strictness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the schema cannot be normalized.
    pub fn normalize_schema(&self, schema: &SchemaInput) -> Result<SchemaSpec> {
        normalize(schema, self.config.schema_strictness())
    }

    /// Model used for `operation` when the call does not name one.
    #[must_use]
    pub fn resolve_model<'a>(&'a self, operation: Operation, call: &'a CallOptions) -> Option<&'a str> {
        call.model().or_else(|| self.config.model_for(operation))
    }

    /// Sends `prompt` and collects the full reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a temperature override outside
    /// `0.0..=2.0`, [`Error::Schema`] if `schema` cannot be normalized and
    /// [`Error::LlmCall`] for any adapter failure.
    pub async fn invoke(
        &self,
        operation: Operation,
        prompt: String,
        call: &CallOptions,
        schema: Option<&SchemaInput>,
    ) -> Result<String> {
        if let Some(temperature) = call.temperature() {
            validate_temperature(temperature).map_err(|err| Error::validation(err.to_string()))?;
        }

        let prompt_len = prompt.len();
        let mut request =
            InferenceRequest::new(vec![PromptMessage::user(prompt)]).map_err(Error::llm_call)?;

        let model = self.resolve_model(operation, call);
        if let Some(model) = model {
            request = request.with_model(model);
        }

        let temperature = call
            .temperature()
            .unwrap_or_else(|| self.config.temperature());
        request = request.with_temperature(temperature);

        if let Some(schema) = schema {
            let spec = self.normalize_schema(schema)?;
            request = request.with_response_schema(&spec);
        }

        for option in call.options() {
            request = option.apply(request);
        }

        debug!(
            %operation,
            model = model.unwrap_or_else(|| self.adapter.metadata().model()),
            temperature,
            prompt_len,
            structured = schema.is_some(),
            "invoking model"
        );

        let mut stream = self.adapter.infer(request).await.map_err(Error::llm_call)?;

        let mut response = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Error::llm_call)?;
            response.push_str(&chunk.delta);
            if chunk.done {
                break;
            }
        }

        debug!(%operation, response_len = response.len(), "model replied");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream;
    use serde_json::json;
    use text_adapters::{
        AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk,
    };

    struct RecordingAdapter {
        metadata: AdapterMetadata,
        requests: Mutex<Vec<InferenceRequest>>,
        fail: bool,
    }

    impl RecordingAdapter {
        fn new() -> Self {
            Self {
                metadata: AdapterMetadata::new("test", "adapter-model"),
                requests: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn last(&self) -> InferenceRequest {
            self.requests.lock().unwrap().last().cloned().expect("request")
        }
    }

    #[async_trait]
    impl ModelAdapter for RecordingAdapter {
        fn metadata(&self) -> &AdapterMetadata {
            &self.metadata
        }

        async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
            self.requests.lock().unwrap().push(request);
            if self.fail {
                return Err(AdapterError::transport("connection refused"));
            }
            let chunks = vec![
                Ok(InferenceChunk::new("hel", false)),
                Ok(InferenceChunk::new("lo", true)),
                Ok(InferenceChunk::new("ignored", true)),
            ];
            Ok(Box::pin(stream::iter(chunks)))
        }
    }

    fn gateway(adapter: Arc<RecordingAdapter>, config: TextConfig) -> ModelGateway {
        ModelGateway::new(adapter, config)
    }

    #[tokio::test]
    async fn collects_chunks_until_done() {
        let adapter = Arc::new(RecordingAdapter::new());
        let gateway = gateway(adapter.clone(), TextConfig::default());
        let reply = gateway
            .invoke(Operation::Summarize, "prompt".into(), &CallOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(reply, "hello");

        let request = adapter.last();
        assert_eq!(request.model(), None);
        assert_eq!(request.temperature(), Some(0.3));
        assert_eq!(request.messages()[0].content(), "prompt");
    }

    #[tokio::test]
    async fn model_and_temperature_precedence() {
        let adapter = Arc::new(RecordingAdapter::new());
        let config = TextConfig::builder()
            .default_model("global")
            .model_for(Operation::Translate, "translator")
            .temperature(0.9)
            .build()
            .unwrap();
        let gateway = gateway(adapter.clone(), config);

        gateway
            .invoke(Operation::Translate, "p".into(), &CallOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(adapter.last().model(), Some("translator"));
        assert_eq!(adapter.last().temperature(), Some(0.9));

        gateway
            .invoke(Operation::Classify, "p".into(), &CallOptions::new(), None)
            .await
            .unwrap();
        assert_eq!(adapter.last().model(), Some("global"));

        let explicit = CallOptions::new().with_model("explicit").with_temperature(0.1);
        gateway
            .invoke(Operation::Translate, "p".into(), &explicit, None)
            .await
            .unwrap();
        assert_eq!(adapter.last().model(), Some("explicit"));
        assert_eq!(adapter.last().temperature(), Some(0.1));
    }

    #[tokio::test]
    async fn schema_and_options_reach_the_request() {
        let adapter = Arc::new(RecordingAdapter::new());
        let gateway = gateway(adapter.clone(), TextConfig::default());
        let schema = SchemaInput::fields([("name", "string")]);
        let call = CallOptions::new()
            .with_option(ChatOption::MaxOutputTokens(32))
            .with_named_option("system_prompt", json!("be terse"))
            .with_named_option("frequency_penalty", json!(0.5))
            .with_named_option("max_tokens", json!("lots"));
        assert_eq!(call.options().len(), 2);

        gateway
            .invoke(Operation::Extract, "p".into(), &call, Some(&schema))
            .await
            .unwrap();

        let request = adapter.last();
        assert_eq!(request.max_output_tokens(), Some(32));
        assert_eq!(request.system_prompt(), Some("be terse"));
        assert_eq!(
            request.response_schema().unwrap()["properties"]["name"]["type"],
            "string"
        );
    }

    #[tokio::test]
    async fn invalid_schema_fails_before_the_call() {
        let adapter = Arc::new(RecordingAdapter::new());
        let gateway = gateway(adapter.clone(), TextConfig::default());
        let err = gateway
            .invoke(
                Operation::Extract,
                "p".into(),
                &CallOptions::new(),
                Some(&SchemaInput::Json(json!(["name"]))),
            )
            .await
            .expect_err("schema error");
        assert!(matches!(err, Error::Schema { .. }));
        assert!(adapter.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_temperature_is_rejected_before_the_call() {
        let adapter = Arc::new(RecordingAdapter::new());
        let gateway = gateway(adapter.clone(), TextConfig::default());
        for temperature in [f32::NAN, f32::INFINITY, -0.1, 7.5] {
            let call = CallOptions::new().with_temperature(temperature);
            let err = gateway
                .invoke(Operation::Summarize, "p".into(), &call, None)
                .await
                .expect_err("temperature error");
            assert!(err.is_validation(), "{temperature}: {err}");
        }
        assert!(adapter.requests.lock().unwrap().is_empty());

        let edge = CallOptions::new().with_temperature(2.0);
        gateway
            .invoke(Operation::Summarize, "p".into(), &edge, None)
            .await
            .unwrap();
        assert_eq!(adapter.last().temperature(), Some(2.0));
    }

    #[tokio::test]
    async fn adapter_failures_become_llm_call_errors() {
        let adapter = Arc::new(RecordingAdapter {
            fail: true,
            ..RecordingAdapter::new()
        });
        let gateway = gateway(adapter, TextConfig::default());
        let err = gateway
            .invoke(Operation::Answer, "p".into(), &CallOptions::new(), None)
            .await
            .expect_err("transport failure");
        assert!(matches!(err, Error::LlmCall { .. }));
        assert!(err.to_string().starts_with("LLM call failed:"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_mut_updates_snapshot() {
        let mut gateway = gateway(Arc::new(RecordingAdapter::new()), TextConfig::default());
        let shared = gateway.clone();
        gateway.config_mut().set_default_model(Some("changed".to_owned()));
        assert_eq!(gateway.config().default_model(), Some("changed"));
        assert_eq!(shared.config().default_model(), None);
    }
}
