//! Evaluates one pitch document and prints the workflow result as JSON.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use ventureflow::config::EvaluatorConfig;
use ventureflow::observability::init_tracing;
use ventureflow::pipeline::Evaluator;

/// Run the startup-evaluation pipeline on a document.
#[derive(Debug, Parser)]
#[command(name = "ventureflow", version, about)]
struct Cli {
    /// Document to evaluate.
    file: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the result.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let config = EvaluatorConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let evaluator = Evaluator::from_config(&config).context("failed to build evaluator")?;

    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let filename = cli
        .file
        .file_name()
        .map_or_else(|| cli.file.display().to_string(), |name| name.to_string_lossy().into_owned());

    let result = evaluator.evaluate(bytes, filename).await;
    evaluator.wait_for_recordings().await;
    info!(run_id = %result.run_id, status = ?result.status, "Evaluation finished");

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("failed to serialize result")?;
    println!("{output}");

    Ok(if result.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
