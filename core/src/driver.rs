//! Read → extract → generate → write.

use std::path::{Path, PathBuf};

use crate::api_client::DiagramGenerator;
use crate::error::{Md2PumlError, Result};
use crate::prompt::build_prompt;
use crate::section::{collect_sections, found_titles};

/// One diagram generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Markdown spec to read
    pub input: PathBuf,
    /// Where the diagram markup is written
    pub output: PathBuf,
    /// Level-2 headings to extract, in order
    pub sections: Vec<String>,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub output: PathBuf,
    /// Titles whose heading was found, in request order
    pub sections_found: Vec<String>,
    pub bytes_written: usize,
}

async fn read_spec(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Md2PumlError::io(format!("failed to read {}", path.display()), e))
}

/// Read the spec and return the combined sections plus the titles found.
async fn load_sections(request: &GenerateRequest) -> Result<(String, Vec<String>)> {
    let markdown = read_spec(&request.input).await?;

    let Some(combined) = collect_sections(&markdown, &request.sections) else {
        tracing::debug!(
            input = %request.input.display(),
            requested = ?request.sections,
            "No requested section found"
        );
        return Err(Md2PumlError::missing_section(&request.sections));
    };

    let found: Vec<String> = found_titles(&markdown, &request.sections)
        .into_iter()
        .map(str::to_string)
        .collect();
    tracing::info!(
        input = %request.input.display(),
        sections = ?found,
        bytes = combined.len(),
        "Extracted sections"
    );

    Ok((combined, found))
}

/// Generate a diagram for `request` using `generator`.
///
/// Fails with [`Md2PumlError::MissingSection`] before calling the generator
/// when none of the requested headings exist. The generator's reply is
/// written to `request.output` unchanged.
pub async fn generate_diagram(
    request: &GenerateRequest,
    generator: &dyn DiagramGenerator,
) -> Result<GenerateOutcome> {
    let (combined, sections_found) = load_sections(request).await?;

    let diagram = generator.generate(&combined).await?;

    tokio::fs::write(&request.output, diagram.as_bytes())
        .await
        .map_err(|e| {
            Md2PumlError::io(
                format!("failed to write {}", request.output.display()),
                e,
            )
        })?;

    tracing::info!(
        output = %request.output.display(),
        bytes = diagram.len(),
        "Diagram written"
    );

    Ok(GenerateOutcome {
        output: request.output.clone(),
        sections_found,
        bytes_written: diagram.len(),
    })
}

/// Build the prompt `generate_diagram` would send, without sending it.
pub async fn render_prompt(request: &GenerateRequest) -> Result<String> {
    let (combined, _) = load_sections(request).await?;
    Ok(build_prompt(&combined))
}
