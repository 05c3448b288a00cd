//! `md2puml` entry point.
//!
//! Usage:
//!
//! ```text
//! md2puml -f docs/spec.md -o docs/diagram.puml
//! ```
//!
//! Requires `OPENAI_API_KEY` in the environment or in a `.env` file.

use std::process::ExitCode;

use clap::Parser;
use md2puml_cli::{Cli, RunReport, run};
use md2puml_core::Md2PumlError;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Variables already in the environment win over `.env`.
    let dotenv_path = dotenvy::dotenv().ok();
    init_logging();
    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(RunReport::Written(outcome)) => {
            println!("✅ Flow diagram written to {}", outcome.output.display());
            ExitCode::SUCCESS
        }
        Ok(RunReport::DryRun { prompt }) => {
            println!("{prompt}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let category = err
                .downcast_ref::<Md2PumlError>()
                .map(|e| e.category().as_str());
            tracing::debug!(category = ?category, "md2puml failed");
            eprintln!("❌ Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Log filter used when `RUST_LOG` is unset or unparsable. Keeps a normal
/// run down to the result line.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
