use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const GROQ_DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors that can occur when calling a text-generation provider
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Text returned by a provider
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Opaque text-completion collaborator.
///
/// One prompt in, one block of text out. Implementations make a single attempt;
/// callers decide what to do with failures.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;

    /// Provider name for logs
    fn provider(&self) -> &'static str;
}

/// Supported providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    Gemini,
}

/// Connection settings shared by the HTTP providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    api_key: Secret<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub structured_output: bool,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: endpoint.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
            structured_output: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn build_client(timeout: Duration) -> Result<Client, GenerationError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

async fn check_status(response: Response) -> Result<Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read body".to_string());

    match status.as_u16() {
        401 | 403 => Err(GenerationError::Unauthorized),
        code => Err(GenerationError::ApiError { status: code, body }),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Groq client (OpenAI-compatible chat completions)
pub struct GroqClient {
    config: ProviderConfig,
    client: Client,
}

impl GroqClient {
    pub fn new(config: ProviderConfig) -> Result<Self, GenerationError> {
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: self
                .config
                .structured_output
                .then(|| serde_json::json!({ "type": "json_object" })),
        };

        tracing::debug!("Calling Groq model {} ({} prompt chars)", self.config.model, prompt.len());

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await?;

        let json: Value = check_status(response).await?.json().await?;

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| GenerationError::InvalidResponse("Missing choices[0].message.content".into()))?;

        Ok(Generation {
            text: text.to_string(),
            model: self.config.model.clone(),
            timestamp: chrono::Utc::now(),
        })
    }

    fn provider(&self) -> &'static str {
        "groq"
    }
}

/// Google Gemini client (`generateContent`)
pub struct GeminiClient {
    config: ProviderConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Result<Self, GenerationError> {
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let mut payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if self.config.structured_output {
            payload["generationConfig"] = serde_json::json!({ "responseMimeType": "application/json" });
        }

        tracing::debug!("Calling Gemini model {} ({} prompt chars)", self.config.model, prompt.len());

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&payload)
            .send()
            .await?;

        let json: Value = check_status(response).await?.json().await?;

        let parts = json
            .pointer("/candidates/0/content/parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| GenerationError::InvalidResponse("Missing candidates[0].content.parts".into()))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.is_empty() {
            return Err(GenerationError::InvalidResponse("Empty completion".into()));
        }

        Ok(Generation {
            text,
            model: self.config.model.clone(),
            timestamp: chrono::Utc::now(),
        })
    }

    fn provider(&self) -> &'static str {
        "gemini"
    }
}

/// Build the client for `provider`
pub fn build_generator(
    provider: Provider,
    config: ProviderConfig,
) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    let generator: Arc<dyn TextGenerator> = match provider {
        Provider::Groq => Arc::new(GroqClient::new(config)?),
        Provider::Gemini => Arc::new(GeminiClient::new(config)?),
    };
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_hides_key() {
        let config = ProviderConfig::new("secret-key", GROQ_DEFAULT_ENDPOINT, GROQ_DEFAULT_MODEL);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert_eq!(config.api_key(), "secret-key");
        assert!(!config.structured_output);
    }

    #[test]
    fn test_gemini_url() {
        let config = ProviderConfig::new("k", "https://example.test/v1beta/", GEMINI_DEFAULT_MODEL);
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.generate_url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_chat_request_omits_response_format() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["content"], "hi");
    }
}
