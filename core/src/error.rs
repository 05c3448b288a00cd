//! md2puml error types
//!
//! Every failure is fatal for the run: the CLI reports it once and exits
//! with status 1. Categories exist for structured logging only.

use thiserror::Error;

use crate::api_client::ApiError;

/// Error category for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// None of the requested headings were present in the document
    MissingSection,
    /// Input could not be read or output could not be written
    IoError,
    /// The generation service failed (auth, network, malformed response)
    ApiError,
    /// Config file or environment misconfigured
    ConfigError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSection => "MISSING_SECTION",
            Self::IoError => "IO_ERROR",
            Self::ApiError => "API_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

/// md2puml error with category and context
#[derive(Debug, Error)]
pub enum Md2PumlError {
    #[error("Unable to find {} sections in the spec.", quote_titles(.titles))]
    MissingSection { titles: Vec<String> },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Md2PumlError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingSection { .. } => ErrorCategory::MissingSection,
            Self::Io { .. } => ErrorCategory::IoError,
            Self::Api(_) => ErrorCategory::ApiError,
            Self::Config { .. } => ErrorCategory::ConfigError,
        }
    }

    /// Create a missing-section error for the requested titles
    pub fn missing_section<S: AsRef<str>>(titles: &[S]) -> Self {
        Self::MissingSection {
            titles: titles.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Create an I/O error with a message naming the file involved
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Renders `["A", "B"]` as `'A' or 'B'`.
fn quote_titles(titles: &[String]) -> String {
    titles
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Result type for md2puml operations
pub type Result<T> = std::result::Result<T, Md2PumlError>;
