//! Command-line front end for `md2puml`.
//!
//! Flag precedence: command line, then environment, then config file, then
//! built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use md2puml_core::{
    GenerateOutcome, GenerateRequest, Md2PumlConfig, OpenAiClient, generate_diagram, render_prompt,
};

/// Generate a PlantUML diagram (.puml) from a Markdown spec including data
/// model and primary flows.
#[derive(Debug, Parser)]
#[command(name = "md2puml", version)]
pub struct Cli {
    /// Path to the Markdown file.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Output .puml file [default: diagram.puml].
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Level-2 heading to extract. Repeat to extract several; replaces the
    /// default "Data Model & Persistence" and "Primary Flows".
    #[arg(long = "section", value_name = "TITLE")]
    pub sections: Vec<String>,

    /// Chat model to use [default: gpt-4o-mini].
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// Config file to read instead of ~/.config/md2puml/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the prompt that would be sent and exit without calling the API.
    #[arg(long)]
    pub dry_run: bool,
}

/// What `run` did, for the binary to report.
#[derive(Debug)]
pub enum RunReport {
    Written(GenerateOutcome),
    DryRun { prompt: String },
}

impl Cli {
    /// Fold command-line overrides into `config`.
    pub fn apply_overrides(&self, config: &mut Md2PumlConfig) -> Result<()> {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if !self.sections.is_empty() {
            config.sections = self.sections.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.validate().context("invalid command-line options")?;
        Ok(())
    }

    fn request(&self, config: &Md2PumlConfig) -> GenerateRequest {
        GenerateRequest {
            input: self.file.clone(),
            output: config.output.clone(),
            sections: config.sections.clone(),
        }
    }
}

pub async fn run(cli: Cli) -> Result<RunReport> {
    let mut config =
        Md2PumlConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config)?;

    let request = cli.request(&config);
    tracing::debug!(?request, model = %config.model, "Resolved request");

    if cli.dry_run {
        let prompt = render_prompt(&request).await?;
        return Ok(RunReport::DryRun { prompt });
    }

    let client = OpenAiClient::new(config.openai_config());
    let outcome = generate_diagram(&request, &client).await?;
    Ok(RunReport::Written(outcome))
}
