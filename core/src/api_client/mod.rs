//! Client for the external diagram generation service.
//!
//! The driver only sees [`DiagramGenerator`]; [`OpenAiClient`] is the real
//! implementation and `mock::MockDiagramGenerator` stands in for it in tests.

mod openai;

pub use openai::{
    DEFAULT_API_KEY_ENV, DEFAULT_MODEL, DEFAULT_TEMPERATURE, OPENAI_API_BASE, OpenAiClient,
    OpenAiConfig,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the generation service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential available.
    #[error("{env_var} is not set; export it or add it to a .env file")]
    NotAuthenticated {
        /// Environment variable the key was expected in.
        env_var: String,
    },

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code.
        status: u16,
        /// Error message from API.
        message: String,
        /// Error type (if provided).
        error_type: Option<String>,
    },

    /// Failed to parse API response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response carried no usable text.
    #[error("Empty response from model {model}")]
    EmptyResponse {
        /// Model that produced the response.
        model: String,
    },
}

/// Result type for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Turns extracted Markdown into diagram markup.
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    /// Generate diagram markup for `markdown`.
    ///
    /// Implementations return the response trimmed of surrounding whitespace.
    async fn generate(&self, markdown: &str) -> ApiResult<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock implementation for tests
// ─────────────────────────────────────────────────────────────────────────────
