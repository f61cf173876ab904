//! Chat-completions API client.
//!
//! Speaks the OpenAI-compatible wire format shared by Groq and OpenRouter:
//! `POST {base_url}/chat/completions` with a bearer key, answer text in
//! `choices[0].message.content`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable names.
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_GROQ_MODEL: &str = "GROQ_MODEL";
pub const ENV_GROQ_BASE_URL: &str = "GROQ_BASE_URL";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_OPENROUTER_BASE_URL: &str = "OPENROUTER_BASE_URL";

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_MODEL: &str = "openai/gpt-4o";

/// Attribution headers OpenRouter uses to identify the calling app.
const OPENROUTER_REFERER: &str = "http://localhost:5173";
const APP_TITLE: &str = "Mini Code Copilot";

/// Read an environment variable, treating empty values as unset.
pub(crate) fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Configuration for one chat-completions provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Stage name used in logs and reports
    pub name: String,
    /// Bearer key; `None` leaves the provider unavailable
    pub api_key: Option<String>,
    /// Model to request
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Sampling temperature, omitted from the request when `None`
    pub temperature: Option<f32>,
    /// Response token cap, omitted from the request when `None`
    pub max_tokens: Option<u32>,
    /// Request timeout; `None` keeps the HTTP client's default (unbounded)
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl ProviderConfig {
    /// Create a bare config with no key and no optional parameters.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_key: None,
            model: model.into(),
            base_url: base_url.into(),
            temperature: None,
            max_tokens: None,
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// Primary provider: Groq, configured from `GROQ_*` variables.
    pub fn groq() -> Self {
        let mut config = Self::new(
            "groq",
            env_non_empty(ENV_GROQ_BASE_URL).unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            env_non_empty(ENV_GROQ_MODEL).unwrap_or_else(|| GROQ_MODEL.to_string()),
        )
        .with_temperature(0.7)
        .with_max_tokens(2048);
        config.api_key = env_non_empty(ENV_GROQ_API_KEY);
        config
    }

    /// Secondary provider: OpenRouter, configured from `OPENROUTER_*` variables.
    pub fn openrouter() -> Self {
        let mut config = Self::new(
            "openrouter",
            env_non_empty(ENV_OPENROUTER_BASE_URL)
                .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
            env_non_empty(ENV_OPENROUTER_MODEL).unwrap_or_else(|| OPENROUTER_MODEL.to_string()),
        )
        .with_header("HTTP-Referer", OPENROUTER_REFERER)
        .with_header("X-Title", APP_TITLE);
        config.api_key = env_non_empty(ENV_OPENROUTER_API_KEY);
        config
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        debug_assert!(
            (0.0..=2.0).contains(&temperature),
            "Temperature must be between 0.0 and 2.0"
        );
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        debug_assert!(max_tokens > 0, "max_tokens must be positive");
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Whether a non-empty API key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Message role in conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-completions client for a single provider.
pub struct ChatClient {
    config: ProviderConfig,
    client: Client,
}

impl ChatClient {
    /// Create a new client with the given config.
    ///
    /// Fails with [`ClientError::MissingApiKey`] when no key is configured.
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        if !config.has_api_key() {
            return Err(ClientError::MissingApiKey {
                provider: config.name.clone(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::HttpError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Send a completion request with an optional system prompt prepended.
    ///
    /// Returns the raw text of the first choice.
    pub async fn complete_with_system(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<String, ClientError> {
        debug_assert!(!messages.is_empty(), "Messages cannot be empty");

        let mut all_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system {
            all_messages.push(Message::system(system));
        }
        all_messages.extend(messages);

        let request = ApiRequest {
            model: &self.config.model,
            messages: &all_messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        // new() guarantees the key is present
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let mut builder = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&request);
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::HttpError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::HttpError(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }

    /// Provider name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the model being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the config.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Extract `choices[0].message.content` from a response body.
fn parse_completion(body: &str) -> Result<String, ClientError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| ClientError::ParseError(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::ParseError("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| ClientError::ParseError("first choice has no content".to_string()))?;

    if content.trim().is_empty() {
        return Err(ClientError::EmptyResponse);
    }

    Ok(content)
}

/// API request body.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// API response body.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Message inside a choice.
#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client errors.
///
/// The orchestrator treats every variant the same way; they exist for
/// diagnostics.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no API key configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("API error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("provider returned empty content")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ProviderConfig::new("test", "http://localhost:9999/v1/", "tiny")
            .with_api_key("sk-test")
            .with_model("bigger")
            .with_temperature(0.5)
            .with_max_tokens(512)
            .with_timeout(Duration::from_secs(5))
            .with_header("X-Title", "Mini Code Copilot");

        assert_eq!(config.model, "bigger");
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let config = ProviderConfig::new("groq", GROQ_BASE_URL, GROQ_MODEL);
        let err = ChatClient::new(config).err().unwrap();
        assert!(matches!(err, ClientError::MissingApiKey { provider } if provider == "groq"));

        let blank = ProviderConfig::new("groq", GROQ_BASE_URL, GROQ_MODEL).with_api_key("  ");
        assert!(ChatClient::new(blank).is_err());
    }

    #[test]
    fn test_message_creation() {
        let system = Message::system("be terse");
        assert_eq!(system.role, Role::System);

        let user = Message::user("Hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Hello");

        let assistant = Message::assistant("Hi there");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_request_omits_unset_parameters() {
        let messages = vec![Message::system("sys"), Message::user("write a loop")];
        let request = ApiRequest {
            model: "m",
            messages: &messages,
            temperature: None,
            max_tokens: Some(10),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "write a loop");
        assert_eq!(json["max_tokens"], 10);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"print(1)"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "print(1)");
    }

    #[test]
    fn test_parse_completion_malformed_shapes() {
        assert!(matches!(
            parse_completion("not json"),
            Err(ClientError::ParseError(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(ClientError::ParseError(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ClientError::ParseError(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":"  "}}]}"#),
            Err(ClientError::EmptyResponse)
        ));
    }
}
