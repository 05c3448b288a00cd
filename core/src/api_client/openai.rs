//! OpenAI Chat Completions client.
//!
//! One non-streaming `POST {base_url}/chat/completions` per run. The first
//! choice's message content is the diagram.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult, DiagramGenerator};
use crate::prompt::build_prompt;

/// Default API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Environment variable holding the API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the OpenAI client.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Temperature for sampling (0.0-2.0).
    pub temperature: f32,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Bearer token. `None` fails the call with `NotAuthenticated`.
    pub api_key: Option<String>,
    /// Where the key was looked up, for error messages.
    pub api_key_env: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: OPENAI_API_BASE.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI error envelope: `{"error": {"message": ..., "type": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Chat Completions client.
pub struct OpenAiClient {
    /// HTTP client for API requests.
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Creates a client with a default HTTP client.
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn headers(&self) -> ApiResult<HeaderMap> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::NotAuthenticated {
                env_var: self.config.api_key_env.clone(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                ApiError::NotAuthenticated {
                    env_var: self.config.api_key_env.clone(),
                }
            })?,
        );
        Ok(headers)
    }

    /// Sends `prompt` as a single user message and returns the trimmed reply.
    pub async fn complete(&self, prompt: &str) -> ApiResult<String> {
        let headers = self.headers()?;
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        tracing::debug!(
            model = %self.config.model,
            endpoint = %self.endpoint(),
            prompt_bytes = prompt.len(),
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Chat completion failed");

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(ApiError::ApiResponse {
                    status: status.as_u16(),
                    message: error_response.error.message,
                    error_type: error_response.error.error_type,
                });
            }

            return Err(ApiError::ApiResponse {
                status: status.as_u16(),
                message: error_text,
                error_type: None,
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::Parse(format!("Failed to parse chat completion: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ApiError::EmptyResponse {
                model: self.config.model.clone(),
            });
        }

        tracing::debug!(response_bytes = content.len(), "Chat completion received");
        Ok(content)
    }
}

#[async_trait]
impl DiagramGenerator for OpenAiClient {
    async fn generate(&self, markdown: &str) -> ApiResult<String> {
        self.complete(&build_prompt(markdown)).await
    }
}
