//! Root of the `md2puml-core` library.
//!
//! Turns the "Data Model & Persistence" and "Primary Flows" sections of a
//! Markdown spec into a PlantUML diagram via the OpenAI Chat Completions API.

// Library code reports through `tracing` and return values; the binary owns
// stdout/stderr.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod api_client;
pub mod config;
mod driver;
pub mod error;
pub mod prompt;
pub mod section;

pub use api_client::{ApiError, DiagramGenerator, OpenAiClient, OpenAiConfig};
pub use config::Md2PumlConfig;
pub use driver::{GenerateOutcome, GenerateRequest, generate_diagram, render_prompt};
pub use error::{ErrorCategory, Md2PumlError, Result};
pub use section::{DEFAULT_SECTIONS, collect_sections, extract_section};
